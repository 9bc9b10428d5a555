//! Artifact checksum calculation.
//!
//! SHA-256 of single files (zip archives) and of directory trees (.app
//! bundles).

use crate::{
    bail,
    bundler::error::{Error, ErrorExt, Result},
};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 checksum of a file or directory.
///
/// Directories are hashed as the sorted sequence of relative path, length
/// and content for every regular file beneath them.
/// Symlinks contribute their target path instead of the pointee's content.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("read metadata of", path)?;

    if metadata.is_file() {
        let mut hasher = Sha256::new();
        hash_file_into(path, &mut hasher).await?;
        Ok(format!("{:x}", hasher.finalize()))
    } else if metadata.is_dir() {
        calculate_directory_sha256(path).await
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }
}

async fn hash_file_into(file_path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("open file for hashing", file_path)?;
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("read file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}

async fn calculate_directory_sha256(dir_path: &Path) -> Result<String> {
    let root = dir_path.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || {
        let mut entries = Vec::new();
        for entry in walkdir::WalkDir::new(&root).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() || entry.file_type().is_symlink() {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        Ok::<_, Error>(entries)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Checksum walk task panicked: {}", e)))??;

    // Each record is `path NUL kind len content`, so no two trees share a stream.
    let mut hasher = Sha256::new();
    for entry in entries {
        let rel_path = entry.path().strip_prefix(dir_path)?;
        hasher.update(rel_path.to_string_lossy().as_bytes());
        hasher.update([0u8]);

        if entry.file_type().is_symlink() {
            let target = tokio::fs::read_link(entry.path())
                .await
                .fs_context("read symlink", entry.path())?;
            let target = target.to_string_lossy();
            hasher.update(b"l");
            hasher.update((target.len() as u64).to_le_bytes());
            hasher.update(target.as_bytes());
        } else {
            let len = entry.metadata()?.len();
            hasher.update(b"f");
            hasher.update(len.to_le_bytes());
            hash_file_into(entry.path(), &mut hasher).await?;
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}
