//! Audit package assembly.
//!
//! Bundles the exported artifacts and the manifest document into one
//! compressed ZIP container with a flat namespace, entry names
//! preserved verbatim from export. Before writing anything the
//! packager re-reads the manifest and confirms every artifact it
//! references is part of the file set: a manifest referencing files
//! absent from the package is a validation failure here, not only in
//! the builder.

use crate::evidence::EvidenceManifest;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors raised while assembling the archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Manifest references an artifact absent from the package: {0}")]
    MissingArtifact(String),

    #[error("Failed to read manifest {path}: {source}")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    ManifestInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Packages the artifact files plus the manifest document into
/// `archive_path`.
///
/// Entry names are the files' own names; no directory nesting. Fails
/// without producing an archive if the manifest references a file not
/// present in `artifact_paths`.
pub fn package_archive(
    artifact_paths: &[&Path],
    manifest_path: &Path,
    archive_path: &Path,
) -> Result<PathBuf, ArchiveError> {
    let manifest_json =
        fs::read_to_string(manifest_path).map_err(|source| ArchiveError::ManifestUnreadable {
            path: manifest_path.to_path_buf(),
            source,
        })?;
    let manifest: EvidenceManifest =
        serde_json::from_str(&manifest_json).map_err(|source| ArchiveError::ManifestInvalid {
            path: manifest_path.to_path_buf(),
            source,
        })?;

    let entry_names: Vec<String> = artifact_paths
        .iter()
        .map(|p| entry_name(p))
        .collect();
    for artifact in &manifest.artifacts {
        if !entry_names.contains(&artifact.name) {
            return Err(ArchiveError::MissingArtifact(artifact.name.clone()));
        }
    }

    let file = File::create(archive_path).map_err(|source| ArchiveError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in artifact_paths.iter().copied().chain([manifest_path]) {
        writer.start_file(entry_name(path), options)?;
        let mut reader = File::open(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        io::copy(&mut reader, &mut writer).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    writer.finish()?;
    info!(
        archive = %archive_path.display(),
        entries = artifact_paths.len() + 1,
        "Packaged audit archive"
    );
    Ok(archive_path.to_path_buf())
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
