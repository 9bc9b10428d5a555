//! Artifact reporting and tool lookup.
//!
//! Every operation that produces something on disk describes it with a
//! [`BundledArtifact`]: where it is, how big it is and its SHA-256.
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`tool_detection`] - External tool availability checking

mod checksum;
pub mod tool_detection;

pub use checksum::calculate_sha256;

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{fmt, path::Path, path::PathBuf};

/// Kind of artifact produced by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// An `.app` directory tree.
    AppBundle,
    /// A zip archive.
    Archive,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppBundle => f.write_str("app bundle"),
            Self::Archive => f.write_str("archive"),
        }
    }
}

/// A produced artifact with its size and checksum.
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// What was produced.
    pub kind: ArtifactKind,
    /// Where it was produced.
    pub path: PathBuf,
    /// Total size in bytes (sum of regular files for directories).
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub checksum: String,
}

impl BundledArtifact {
    /// Measures and hashes the artifact at `path`.
    pub async fn describe(kind: ArtifactKind, path: &Path) -> Result<Self> {
        let size = disk_size(path).await?;
        let checksum = calculate_sha256(path).await?;
        Ok(Self {
            kind,
            path: path.to_path_buf(),
            size,
            checksum,
        })
    }
}

async fn disk_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::symlink_metadata(path)
        .await
        .fs_context("read artifact metadata", path)?;
    if !metadata.is_dir() {
        return Ok(metadata.len());
    }

    let root = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut size = 0u64;
        for entry in walkdir::WalkDir::new(&root).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() {
                size += entry.metadata()?.len();
            }
        }
        Ok::<_, Error>(size)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Size calculation task panicked: {}", e)))?
}
