//! Evidence integrity: content digests and the export-run manifest.
//!
//! Every exported artifact is content-addressed with SHA-256 so that a
//! third party can later recompute the digest over a received copy and
//! detect any modification. Digesting streams the file in fixed-size
//! chunks; the digest is a pure function of the content bytes and is
//! identical regardless of chunk size.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// File name of the manifest document.
pub const MANIFEST_FILE: &str = "evidence_manifest.json";

/// Chunk size used when streaming artifact bytes through the hasher.
const DIGEST_CHUNK_SIZE: usize = 8192;

/// Errors raised while building or writing a manifest.
///
/// A listed artifact that is missing or unreadable aborts manifest
/// construction outright: a manifest that silently omits an artifact
/// would understate what needs verification.
#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("Artifact missing or unreadable: {path}: {source}")]
    UnreadableArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Metadata record for one exported file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceArtifact {
    /// Display name (the file name).
    pub name: String,
    /// Storage path at export time.
    pub path: String,
    /// Lowercase hex SHA-256 digest of the file's content, 64 chars.
    pub sha256: String,
}

/// The integrity envelope for one export run. Immutable once built; a
/// new run produces a new manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceManifest {
    /// Identifier of the export run that produced this manifest.
    pub run_id: Uuid,
    /// When the manifest was generated.
    pub generated_at: DateTime<Utc>,
    /// Operator or team that ran the export.
    pub team_or_user: String,
    /// Version of the tool that produced the package.
    pub app_version: String,
    /// Digested artifacts, in export order.
    pub artifacts: Vec<EvidenceArtifact>,
}

/// Computes the SHA-256 digest of a file's full byte content,
/// streaming in fixed-size chunks so arbitrarily large artifacts never
/// reside in memory at once.
pub fn sha256_file(path: &Path) -> Result<String, EvidenceError> {
    let mut file = File::open(path).map_err(|source| EvidenceError::UnreadableArtifact {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; DIGEST_CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|source| EvidenceError::UnreadableArtifact {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Recomputes a file's digest and compares it to an expected value.
///
/// This is the verification a package recipient performs; the builder
/// only guarantees the recorded digests are correct at generation time.
pub fn verify_digest(path: &Path, expected: &str) -> Result<bool, EvidenceError> {
    let actual = sha256_file(path)?;
    let matches = actual == expected;
    if !matches {
        warn!(
            path = %path.display(),
            expected,
            actual,
            "Digest mismatch: artifact content differs from manifest"
        );
    }
    Ok(matches)
}

/// Assembles evidence manifests for export runs.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    team_or_user: String,
    app_version: String,
}

impl ManifestBuilder {
    /// Creates a builder with the operator identity and tool version
    /// recorded on every manifest it produces.
    pub fn new(team_or_user: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            team_or_user: team_or_user.into(),
            app_version: app_version.into(),
        }
    }

    /// Digests the given finalized artifacts, in order, and assembles
    /// the manifest for `run_id`.
    ///
    /// Every path must exist and be fully written before this is
    /// called; the first missing or unreadable path aborts the build.
    pub fn build(
        &self,
        run_id: Uuid,
        artifact_paths: &[&Path],
    ) -> Result<EvidenceManifest, EvidenceError> {
        let mut artifacts = Vec::with_capacity(artifact_paths.len());
        for path in artifact_paths {
            let sha256 = sha256_file(path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            artifacts.push(EvidenceArtifact {
                name,
                path: path.display().to_string(),
                sha256,
            });
        }

        info!(
            run_id = %run_id,
            artifact_count = artifacts.len(),
            "Built evidence manifest"
        );

        Ok(EvidenceManifest {
            run_id,
            generated_at: Utc::now(),
            team_or_user: self.team_or_user.clone(),
            app_version: self.app_version.clone(),
            artifacts,
        })
    }
}

/// Writes the manifest document under `out_dir` and returns its path.
pub fn write_manifest(
    manifest: &EvidenceManifest,
    out_dir: &Path,
) -> Result<PathBuf, EvidenceError> {
    let path = out_dir.join(MANIFEST_FILE);
    let bytes = serde_json::to_vec_pretty(manifest)?;
    fs::write(&path, bytes).map_err(|source| EvidenceError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
