//! # mw-core
//!
//! Core data model and pipeline for Model Warden.
//!
//! This crate provides the governance inventory store, the
//! deterministic risk tiering engine, the lifecycle risk catalog, and
//! the evidence pipeline that exports audit artifacts, content-addresses
//! them with SHA-256, and bundles them into a tamper-evident package.

pub mod archive;
pub mod evidence;
pub mod export;
pub mod lifecycle;
pub mod run;
pub mod scoring;
pub mod store;
pub mod system;

pub use archive::{package_archive, ArchiveError};
pub use evidence::{
    sha256_file, verify_digest, EvidenceArtifact, EvidenceError, EvidenceManifest,
    ManifestBuilder, MANIFEST_FILE,
};
pub use export::{export_artifacts, ExportError, ExportedArtifacts};
pub use lifecycle::{LifecyclePhase, LifecycleRisk, RiskCategory, RiskValidationError};
pub use run::{ExportRun, RunError, RunStage};
pub use scoring::{
    required_controls, score_system, RiskTier, RiskTierResult, ScoreBreakdown, SCORING_VERSION,
};
pub use store::{CascadeSummary, RecordStore, StoreError};
pub use system::{
    AiType, AutomationLevel, DataSensitivity, DecisionCriticality, DeploymentMode, SystemRecord,
    SystemRecordUpdate,
};
