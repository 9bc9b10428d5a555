//! File system utilities for bundling and trimming.
//!
//! Every removal is idempotent: a missing target is logged and skipped.
//! Every creation is strict: an existing target is an error.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Component, Path, PathBuf},
};
use tokio::fs;

/// Creates a single directory, failing if anything already exists at `path`.
pub async fn create_new_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::AlreadyExists {
            kind: "directory",
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e).fs_context("create directory", path),
    }
}

/// Removes the file if it exists. Returns whether anything was removed.
pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if !path.is_file() {
        log::info!("File {} was not found.", path.display());
        return Ok(false);
    }
    log::info!("Removing file {}", path.display());
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("remove file", path),
    }
}

/// Removes the directory and its contents if it exists. Returns whether
/// anything was removed.
pub async fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        log::info!("Directory {} was not found.", path.display());
        return Ok(false);
    }
    log::info!("Removing directory {}", path.display());
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("remove directory", path),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::NotFound {
            kind: "file",
            path: from.to_path_buf(),
        });
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("create directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copy file to", to)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them.
/// Fails if the source path is not a directory or doesn't exist,
/// or if the destination path already exists.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::NotFound {
            kind: "directory",
            path: from.to_path_buf(),
        });
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }
    if to.symlink_metadata().is_ok() {
        return Err(Error::AlreadyExists {
            kind: "destination",
            path: to.to_path_buf(),
        });
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("create directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            debug_assert!(entry.path().starts_with(&from));
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("read symlink", entry.path())?;
                if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path).fs_context("create symlink", &dest_path)?;
                } else {
                    symlink_file(&target, &dest_path).fs_context("create symlink", &dest_path)?;
                }
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("create directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copy file to", &dest_path)?;
            }
        }

        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Sets the execute bit wherever the read bit is set (user, group, other).
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).await.fs_context("read metadata of", path)?;
    let mode = executable_mode(metadata.permissions().mode());
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .fs_context("set permissions on", path)?;
    log::debug!("Set mode {:o} on {}", mode & 0o7777, path.display());
    Ok(())
}

/// No permission bits to set outside unix.
#[cfg(not(unix))]
pub async fn make_executable(path: &Path) -> Result<()> {
    log::debug!("Skipping chmod of {} on this platform", path.display());
    Ok(())
}

/// Copies each read bit onto the matching execute bit.
pub fn executable_mode(mode: u32) -> u32 {
    mode | ((mode & 0o444) >> 2)
}

/// True when `path` names something strictly below the directory it is
/// joined onto: non-empty, relative, and made only of normal components.
pub fn is_contained_relative(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

/// Removes every file under `root` whose name ends in `.{extension}`.
///
/// Returns the number of files removed.
pub async fn remove_files_with_extension(root: &Path, extension: &str) -> Result<usize> {
    let suffix = format!(".{extension}");
    let files = collect_bottom_up(root, move |entry| {
        entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(&suffix)
    })
    .await?;

    let mut removed = 0;
    for file in files {
        if remove_file_if_exists(&file).await? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Removes every directory under `root` called `name`, deepest first.
///
/// Returns the number of directories removed.
pub async fn remove_dirs_named(root: &Path, name: &str) -> Result<usize> {
    let name = name.to_string();
    let dirs = collect_bottom_up(root, move |entry| {
        entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == name.as_str()
    })
    .await?;

    let mut removed = 0;
    for dir in dirs {
        if remove_dir_if_exists(&dir).await? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Walks `root` children-before-parents and collects the paths accepted by
/// `filter`. Symlinks are not followed.
async fn collect_bottom_up<F>(root: &Path, filter: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&walkdir::DirEntry) -> bool + Send + 'static,
{
    if !root.is_dir() {
        return Err(Error::NotFound {
            kind: "directory",
            path: root.to_path_buf(),
        });
    }

    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut found = Vec::new();
        for entry in walkdir::WalkDir::new(&root)
            .follow_links(false)
            .contents_first(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            if filter(&entry) {
                found.push(entry.into_path());
            }
        }
        Ok::<_, Error>(found)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory walk task panicked: {}", e)))?
}
