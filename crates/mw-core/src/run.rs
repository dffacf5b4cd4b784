//! Export run state machine.
//!
//! An export run drives the pipeline `Empty -> ArtifactsExported ->
//! ManifestBuilt -> Packaged` strictly forward. Each stage consumes the
//! previous stage's fully committed output; a failed stage aborts the
//! run, and recovery is a fresh run from `Empty` against its own output
//! location. `Packaged` is terminal.

use crate::archive::{self, ArchiveError};
use crate::evidence::{EvidenceError, EvidenceManifest, ManifestBuilder};
use crate::export::{self, ExportError, ExportedArtifacts};
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

/// Stages of an export run, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStage {
    /// Nothing produced yet.
    Empty,
    /// All audit artifacts are durably written.
    ArtifactsExported,
    /// The manifest is built and written.
    ManifestBuilt,
    /// The archive exists; terminal.
    Packaged,
    /// A stage failed; the run cannot advance.
    Aborted,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStage::Empty => write!(f, "EMPTY"),
            RunStage::ArtifactsExported => write!(f, "ARTIFACTS_EXPORTED"),
            RunStage::ManifestBuilt => write!(f, "MANIFEST_BUILT"),
            RunStage::Packaged => write!(f, "PACKAGED"),
            RunStage::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Errors raised while advancing an export run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Invalid stage transition: {operation} requires {required}, run is {actual}")]
    InvalidStage {
        operation: &'static str,
        required: RunStage,
        actual: RunStage,
    },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// One export run against one output directory.
#[derive(Debug)]
pub struct ExportRun {
    run_id: Uuid,
    output_dir: PathBuf,
    stage: RunStage,
    artifacts: Option<ExportedArtifacts>,
    manifest: Option<EvidenceManifest>,
    manifest_path: Option<PathBuf>,
    archive_path: Option<PathBuf>,
}

impl ExportRun {
    /// Starts a fresh run with its own identifier. The output directory
    /// must not be shared with a concurrently running export.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, "Starting export run");
        Self {
            run_id,
            output_dir: output_dir.into(),
            stage: RunStage::Empty,
            artifacts: None,
            manifest: None,
            manifest_path: None,
            archive_path: None,
        }
    }

    /// This run's identifier.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The current stage.
    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Artifacts exported by this run, once available.
    pub fn artifacts(&self) -> Option<&ExportedArtifacts> {
        self.artifacts.as_ref()
    }

    /// The manifest built by this run, once available.
    pub fn manifest(&self) -> Option<&EvidenceManifest> {
        self.manifest.as_ref()
    }

    /// The packaged archive path, once available.
    pub fn archive_path(&self) -> Option<&Path> {
        self.archive_path.as_deref()
    }

    fn require_stage(
        &self,
        operation: &'static str,
        required: RunStage,
    ) -> Result<(), RunError> {
        if self.stage != required {
            return Err(RunError::InvalidStage {
                operation,
                required,
                actual: self.stage,
            });
        }
        Ok(())
    }

    /// Stage 1: writes all audit artifacts from the store's current
    /// committed state.
    #[instrument(skip(self, store), fields(run_id = %self.run_id))]
    pub fn export_artifacts(
        &mut self,
        store: &RecordStore,
    ) -> Result<&ExportedArtifacts, RunError> {
        self.require_stage("export_artifacts", RunStage::Empty)?;
        match export::export_artifacts(store, &self.output_dir) {
            Ok(artifacts) => {
                self.artifacts = Some(artifacts);
                self.stage = RunStage::ArtifactsExported;
                info!(stage = %self.stage, "Export run advanced");
                Ok(self.artifacts.as_ref().expect("just set"))
            }
            Err(e) => {
                self.stage = RunStage::Aborted;
                Err(e.into())
            }
        }
    }

    /// Stage 2: digests the finalized artifacts and writes the
    /// manifest document. Runs only after every artifact is durably on
    /// storage.
    #[instrument(skip(self, builder), fields(run_id = %self.run_id))]
    pub fn build_manifest(
        &mut self,
        builder: &ManifestBuilder,
    ) -> Result<&EvidenceManifest, RunError> {
        self.require_stage("build_manifest", RunStage::ArtifactsExported)?;
        let artifacts = self
            .artifacts
            .as_ref()
            .expect("artifacts exist at ARTIFACTS_EXPORTED");

        let built = builder
            .build(self.run_id, &artifacts.paths())
            .and_then(|manifest| {
                let path = crate::evidence::write_manifest(&manifest, &self.output_dir)?;
                Ok((manifest, path))
            });

        match built {
            Ok((manifest, path)) => {
                self.manifest = Some(manifest);
                self.manifest_path = Some(path);
                self.stage = RunStage::ManifestBuilt;
                info!(stage = %self.stage, "Export run advanced");
                Ok(self.manifest.as_ref().expect("just set"))
            }
            Err(e) => {
                self.stage = RunStage::Aborted;
                Err(e.into())
            }
        }
    }

    /// Stage 3: bundles the artifacts and the manifest into the final
    /// archive. Terminal.
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub fn package(&mut self, archive_name: &str) -> Result<&Path, RunError> {
        self.require_stage("package", RunStage::ManifestBuilt)?;
        let artifacts = self
            .artifacts
            .as_ref()
            .expect("artifacts exist at MANIFEST_BUILT");
        let manifest_path = self
            .manifest_path
            .as_ref()
            .expect("manifest path exists at MANIFEST_BUILT");

        let archive_path = self.output_dir.join(archive_name);
        match archive::package_archive(&artifacts.paths(), manifest_path, &archive_path) {
            Ok(path) => {
                self.archive_path = Some(path);
                self.stage = RunStage::Packaged;
                info!(stage = %self.stage, "Export run complete");
                Ok(self.archive_path.as_deref().expect("just set"))
            }
            Err(e) => {
                self.stage = RunStage::Aborted;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{LifecyclePhase, LifecycleRisk, RiskCategory};
    use crate::system::{
        AiType, AutomationLevel, DataSensitivity, DecisionCriticality, DeploymentMode,
        SystemRecord,
    };
    use tempfile::TempDir;

    fn populated_store() -> RecordStore {
        let mut store = RecordStore::new();
        let id = store
            .register(SystemRecord::new(
                "Support Assistant",
                "Answers customer FAQs",
                "Customer Service",
                AiType::Llm,
                "Head of CX",
                DeploymentMode::HumanInLoop,
                DecisionCriticality::Medium,
                AutomationLevel::Advisory,
                DataSensitivity::Confidential,
                vec!["Knowledge Base API".to_string()],
            ))
            .unwrap();
        store.recompute_tier(id).unwrap();
        store
            .record_risk(
                LifecycleRisk::new(
                    id,
                    LifecyclePhase::Deployment,
                    RiskCategory::Reputational,
                    "Generates misleading answers",
                    4,
                    4,
                )
                .unwrap(),
            )
            .unwrap();
        store
    }

    fn builder() -> ManifestBuilder {
        ManifestBuilder::new("team", "0.3.0")
    }

    #[test]
    fn test_full_run_reaches_packaged() {
        let store = populated_store();
        let dir = TempDir::new().unwrap();
        let mut run = ExportRun::new(dir.path());

        assert_eq!(run.stage(), RunStage::Empty);
        run.export_artifacts(&store).unwrap();
        assert_eq!(run.stage(), RunStage::ArtifactsExported);
        run.build_manifest(&builder()).unwrap();
        assert_eq!(run.stage(), RunStage::ManifestBuilt);
        run.package("audit_package.zip").unwrap();
        assert_eq!(run.stage(), RunStage::Packaged);

        assert!(run.archive_path().unwrap().exists());
        assert_eq!(run.manifest().unwrap().run_id, run.run_id());
    }

    #[test]
    fn test_stages_cannot_run_out_of_order() {
        let store = populated_store();
        let dir = TempDir::new().unwrap();
        let mut run = ExportRun::new(dir.path());

        let result = run.build_manifest(&builder());
        assert!(matches!(result, Err(RunError::InvalidStage { .. })));

        let result = run.package("audit_package.zip");
        assert!(matches!(result, Err(RunError::InvalidStage { .. })));

        run.export_artifacts(&store).unwrap();
        // Re-running a completed stage is also rejected.
        let result = run.export_artifacts(&store);
        assert!(matches!(result, Err(RunError::InvalidStage { .. })));
    }

    #[test]
    fn test_packaged_is_terminal() {
        let store = populated_store();
        let dir = TempDir::new().unwrap();
        let mut run = ExportRun::new(dir.path());
        run.export_artifacts(&store).unwrap();
        run.build_manifest(&builder()).unwrap();
        run.package("audit_package.zip").unwrap();

        let result = run.package("audit_package.zip");
        assert!(matches!(result, Err(RunError::InvalidStage { .. })));
    }

    #[test]
    fn test_failed_stage_aborts_run() {
        let store = populated_store();
        let dir = TempDir::new().unwrap();
        let mut run = ExportRun::new(dir.path());
        run.export_artifacts(&store).unwrap();

        // Destroy an artifact so digesting fails.
        std::fs::remove_file(&run.artifacts().unwrap().inventory_csv).unwrap();
        let result = run.build_manifest(&builder());
        assert!(matches!(result, Err(RunError::Evidence(_))));
        assert_eq!(run.stage(), RunStage::Aborted);

        // The aborted run cannot advance; a fresh run is required.
        let result = run.build_manifest(&builder());
        assert!(matches!(result, Err(RunError::InvalidStage { .. })));
    }

    #[test]
    fn test_two_runs_have_distinct_identifiers() {
        let dir = TempDir::new().unwrap();
        let first = ExportRun::new(dir.path());
        let second = ExportRun::new(dir.path());
        assert_ne!(first.run_id(), second.run_id());
    }
}
