//! Folder compression into zip archives.
//!
//! Prefers the system `zip` tool (`zip --symlinks -r`) and falls back to an
//! in-process writer with the same semantics when it is not installed.
//! Both keep symlinks as symlinks and preserve unix permission bits.

use crate::bundler::{
    builder::tool_detection::ZIP_TOOL,
    error::{Error, ErrorExt, Result},
    utils::process,
};
use path_absolutize::Absolutize;
use std::{
    ffi::OsString,
    fs::File,
    path::{Component, Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// How the folder appears inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveMode {
    /// Entries are rooted at the folder's own name (`Foo.app/Contents/...`).
    ZipAsFolder,
    /// Entries are the folder's contents (`Contents/...`).
    ZipContents,
}

/// Which implementation writes the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archiver {
    /// The `zip` command line tool at the given path.
    External(PathBuf),
    /// The in-process writer.
    Native,
}

impl Archiver {
    /// External `zip` when it is on `PATH`, otherwise the native writer.
    pub fn detect() -> Self {
        match ZIP_TOOL.as_ref() {
            Some(path) => Self::External(path.clone()),
            None => {
                log::debug!("zip not available - using built-in archive writer");
                Self::Native
            }
        }
    }
}

/// Compresses `folder` into `zip_path` using the detected archiver.
///
/// Fails if `zip_path` already exists or `folder` is not a directory.
pub async fn compress_folder(folder: &Path, zip_path: &Path, mode: ArchiveMode) -> Result<PathBuf> {
    compress_folder_with(folder, zip_path, mode, &[], &Archiver::detect()).await
}

/// Compresses `folder` into `zip_path`, skipping top-level entries named in
/// `exclude` (relative to the folder).
///
/// Returns the absolute path of the archive.
pub async fn compress_folder_with(
    folder: &Path,
    zip_path: &Path,
    mode: ArchiveMode,
    exclude: &[&str],
    archiver: &Archiver,
) -> Result<PathBuf> {
    let folder = folder.absolutize().fs_context("resolve", folder)?.into_owned();
    let zip_path = zip_path
        .absolutize()
        .fs_context("resolve", zip_path)?
        .into_owned();

    if zip_path.symlink_metadata().is_ok() {
        return Err(Error::AlreadyExists {
            kind: "destination file",
            path: zip_path,
        });
    }
    if !folder.is_dir() {
        return Err(Error::NotFound {
            kind: "directory",
            path: folder,
        });
    }

    log::info!(
        "Compressing {} into {}",
        folder.display(),
        zip_path.display()
    );

    match archiver {
        Archiver::External(tool) => {
            run_external_zip(tool, &folder, &zip_path, mode, exclude).await?;
        }
        Archiver::Native => {
            let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
            let (folder, zip_path) = (folder.clone(), zip_path.clone());
            tokio::task::spawn_blocking(move || write_native_zip(&folder, &zip_path, mode, &exclude))
                .await
                .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))??;
        }
    }

    Ok(zip_path)
}

async fn run_external_zip(
    tool: &Path,
    folder: &Path,
    zip_path: &Path,
    mode: ArchiveMode,
    exclude: &[&str],
) -> Result<()> {
    let (cwd, root) = match mode {
        ArchiveMode::ZipAsFolder => {
            let parent = folder.parent().ok_or_else(|| {
                Error::GenericError(format!("{} has no parent directory", folder.display()))
            })?;
            let name = folder.file_name().ok_or_else(|| {
                Error::GenericError(format!("{} has no folder name", folder.display()))
            })?;
            (parent.to_path_buf(), PathBuf::from(name))
        }
        ArchiveMode::ZipContents => (folder.to_path_buf(), PathBuf::from(".")),
    };

    let mut args: Vec<OsString> = vec![
        "--symlinks".into(),
        "-r".into(),
        zip_path.as_os_str().to_owned(),
        root.as_os_str().to_owned(),
    ];
    if !exclude.is_empty() {
        args.push("-x".into());
        for name in exclude {
            let pattern = match mode {
                ArchiveMode::ZipAsFolder => root.join(name).join("*"),
                ArchiveMode::ZipContents => Path::new(name).join("*"),
            };
            args.push(pattern.into_os_string());
        }
    }

    process::run_tool(tool, &args, Some(cwd.as_path())).await?;
    Ok(())
}

fn write_native_zip(
    folder: &Path,
    zip_path: &Path,
    mode: ArchiveMode,
    exclude: &[String],
) -> Result<()> {
    let prefix = match mode {
        ArchiveMode::ZipAsFolder => folder.file_name().map(PathBuf::from).unwrap_or_default(),
        ArchiveMode::ZipContents => PathBuf::new(),
    };

    let file = File::create_new(zip_path).fs_context("create archive", zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let walker = walkdir::WalkDir::new(folder)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, folder, exclude));

    for entry in walker {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(folder)?;
        let name_path = prefix.join(rel_path);
        if name_path.as_os_str().is_empty() {
            continue;
        }
        let name = entry_name(&name_path);
        let entry_options = options.unix_permissions(permission_bits(entry.path())?);

        if entry.file_type().is_symlink() {
            let target = std::fs::read_link(entry.path()).fs_context("read symlink", entry.path())?;
            writer.add_symlink(name, target.to_string_lossy(), entry_options)?;
        } else if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), entry_options)?;
        } else {
            writer.start_file(name, entry_options)?;
            let mut source = File::open(entry.path()).fs_context("open file for archiving", entry.path())?;
            std::io::copy(&mut source, &mut writer).fs_context("archive file", entry.path())?;
        }
    }

    writer.finish()?;
    Ok(())
}

fn is_excluded(entry: &walkdir::DirEntry, folder: &Path, exclude: &[String]) -> bool {
    if entry.depth() != 1 {
        return false;
    }
    entry
        .path()
        .strip_prefix(folder)
        .ok()
        .and_then(|rel| rel.to_str())
        .is_some_and(|rel| exclude.iter().any(|name| name == rel))
}

/// Archive entry names always use `/`.
fn entry_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn permission_bits(path: &Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::symlink_metadata(path).fs_context("read metadata of", path)?;
    Ok(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(path: &Path) -> Result<u32> {
    let metadata = std::fs::symlink_metadata(path).fs_context("read metadata of", path)?;
    Ok(if metadata.is_dir() { 0o755 } else { 0o644 })
}
