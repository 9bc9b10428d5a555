//! Standard-library trimmer for portable interpreter trees.
//!
//! Shrinks `<python>/lib/<version>` by deleting packages a bundled app never
//! needs, replacing sources with legacy-location bytecode (`foo.pyc` next to
//! where `foo.py` was) and dropping `__pycache__` directories.

use crate::bundler::{
    archive::{self, ArchiveMode, Archiver},
    error::{Error, ErrorExt, Result},
    settings::{TrimSettings, ZIP_KEEP_DIRS},
    utils::{fs, process},
};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Name of bytecode cache directories.
pub const PYCACHE_DIR: &str = "__pycache__";

/// What a trim run removed and produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrimReport {
    /// Configured directories that existed and were removed.
    pub removed_dirs: usize,
    /// `__pycache__` directories removed (both passes).
    pub removed_caches: usize,
    /// `.py` files removed after compilation.
    pub removed_sources: usize,
    /// Zipped standard library, when requested.
    pub archive: Option<PathBuf>,
}

/// Trims the standard library of the interpreter tree in `settings`.
///
/// # Process
///
/// 1. Remove each configured directory under `lib/<version>`
/// 2. Remove `__pycache__` directories
/// 3. Compile everything with `<interpreter> -m compileall -b -f`
/// 4. Remove the `.py` sources
/// 5. Remove `__pycache__` directories again
/// 6. Optionally zip the compiled library and drop the zipped parts
pub async fn trim_stdlib(settings: &TrimSettings) -> Result<TrimReport> {
    let python_dir = settings.python_dir();
    if !python_dir.is_dir() {
        return Err(Error::NotFound {
            kind: "python directory",
            path: python_dir.to_path_buf(),
        });
    }
    let std_lib = settings.std_lib_path();
    if !std_lib.is_dir() {
        return Err(Error::NotFound {
            kind: "standard library",
            path: std_lib,
        });
    }
    let interpreter = settings.interpreter_path();
    if !interpreter.is_file() {
        return Err(Error::NotFound {
            kind: "interpreter",
            path: interpreter,
        });
    }

    let mut report = TrimReport::default();

    log::info!("Removing unnecessary directories:");
    report.removed_dirs = remove_unneeded_dirs(&std_lib, settings.remove_dirs()).await?;

    log::info!("Removing __pycache__ directories from {}", std_lib.display());
    report.removed_caches += remove_pycache_dirs(&std_lib).await?;

    log::info!("Compiling Python files in {}", std_lib.display());
    compile_pyc_dir(&interpreter, &std_lib).await?;

    log::info!("Removing Python source files from {}", std_lib.display());
    report.removed_sources = remove_file_type_from("py", &std_lib).await?;

    log::info!("Removing __pycache__ directories from {}", std_lib.display());
    report.removed_caches += remove_pycache_dirs(&std_lib).await?;

    if settings.zip_stdlib() {
        report.archive = Some(zip_std_lib(&std_lib, &settings.std_lib_archive_path()).await?);
    }

    Ok(report)
}

/// Removes each of `dirs` (relative to `std_lib`) that exists.
///
/// Every entry must stay inside `std_lib`; nothing is removed otherwise.
pub async fn remove_unneeded_dirs(std_lib: &Path, dirs: &[String]) -> Result<usize> {
    if let Some(dir) = dirs.iter().find(|d| !fs::is_contained_relative(Path::new(d))) {
        return Err(Error::OutsideRoot {
            kind: "directory to remove",
            root: std_lib.to_path_buf(),
            path: PathBuf::from(dir),
        });
    }

    let mut removed = 0;
    for dir in dirs {
        if fs::remove_dir_if_exists(&std_lib.join(dir)).await? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Removes every `__pycache__` directory below `scan_path`.
pub async fn remove_pycache_dirs(scan_path: &Path) -> Result<usize> {
    fs::remove_dirs_named(scan_path, PYCACHE_DIR).await
}

/// Removes every file with `extension` below `scan_path`.
pub async fn remove_file_type_from(extension: &str, scan_path: &Path) -> Result<usize> {
    fs::remove_files_with_extension(scan_path, extension).await
}

/// Byte-compiles every source below `src_path` into legacy `.pyc` files,
/// overwriting existing bytecode.
///
/// Any diagnostic on stderr aborts the trim, since a source that failed to
/// compile would otherwise be deleted without a replacement.
pub async fn compile_pyc_dir(interpreter: &Path, src_path: &Path) -> Result<()> {
    let args = [
        OsStr::new("-m"),
        OsStr::new("compileall"),
        OsStr::new("-b"),
        OsStr::new("-f"),
        src_path.as_os_str(),
    ];
    process::run_tool(interpreter, args, None)
        .await
        .map(|_| ())
}

/// Zips the contents of `std_lib` into `archive_path` and removes what was
/// zipped. Entries in [`ZIP_KEEP_DIRS`] stay on disk.
async fn zip_std_lib(std_lib: &Path, archive_path: &Path) -> Result<PathBuf> {
    log::info!("Compressing the standard library {}", std_lib.display());
    let archive = archive::compress_folder_with(
        std_lib,
        archive_path,
        ArchiveMode::ZipContents,
        ZIP_KEEP_DIRS,
        &Archiver::detect(),
    )
    .await?;

    log::info!("Removing zipped entries from {}", std_lib.display());
    let mut entries = tokio::fs::read_dir(std_lib)
        .await
        .fs_context("read directory", std_lib)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("read directory", std_lib)?
    {
        let name = entry.file_name();
        if ZIP_KEEP_DIRS.iter().any(|keep| name == *keep) {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type().await.fs_context("read file type of", &path)?;
        if file_type.is_dir() {
            fs::remove_dir_if_exists(&path).await?;
        } else {
            tokio::fs::remove_file(&path)
                .await
                .fs_context("remove file", &path)?;
        }
    }

    Ok(archive)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Stands in for `python -m compileall -b -f <dir>`: copies `x.py` to `x.pyc`.
    const FAKE_COMPILEALL: &str = "#!/bin/sh\n\
        find \"$5\" -name '*.py' | while read -r f; do cp \"$f\" \"${f}c\"; done\n";

    const FAILING_COMPILEALL: &str = "#!/bin/sh\n\
        echo '*** Error compiling bad.py' >&2\n";

    fn portable_python(root: &Path, compiler: &str) -> PathBuf {
        let python = root.join("python");
        let lib = python.join("lib/python3.6");
        for dir in ["ensurepip", "idlelib", "test", "json/__pycache__", "lib-dynload", "__pycache__"] {
            std::fs::create_dir_all(lib.join(dir)).unwrap();
        }
        std::fs::write(lib.join("os.py"), "import sys\n").unwrap();
        std::fs::write(lib.join("json/__init__.py"), "").unwrap();
        std::fs::write(lib.join("json/__pycache__/__init__.cpython-36.pyc"), "").unwrap();
        std::fs::write(lib.join("lib-dynload/_ssl.so"), "").unwrap();
        std::fs::write(lib.join("idlelib/idle.py"), "").unwrap();

        let bin = python.join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let interpreter = bin.join("python3.6");
        std::fs::write(&interpreter, compiler).unwrap();
        std::fs::set_permissions(&interpreter, std::fs::Permissions::from_mode(0o755)).unwrap();
        python
    }

    #[tokio::test]
    async fn trims_and_compiles() {
        let tmp = tempfile::tempdir().unwrap();
        let python = portable_python(tmp.path(), FAKE_COMPILEALL);
        let lib = python.join("lib/python3.6");

        let report = trim_stdlib(&TrimSettings::new(&python)).await.unwrap();

        assert_eq!(report.removed_dirs, 3);
        assert_eq!(report.removed_caches, 2);
        assert_eq!(report.removed_sources, 2);
        assert_eq!(report.archive, None);
        for gone in ["ensurepip", "idlelib", "test", "__pycache__", "json/__pycache__", "os.py"] {
            assert!(!lib.join(gone).exists(), "{gone} should be removed");
        }
        assert!(lib.join("os.pyc").is_file());
        assert!(lib.join("json/__init__.pyc").is_file());
        assert!(lib.join("lib-dynload/_ssl.so").is_file());
    }

    #[tokio::test]
    async fn missing_removal_dirs_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let python = portable_python(tmp.path(), FAKE_COMPILEALL);
        let settings = TrimSettings::new(&python)
            .with_remove_dirs(vec!["idlelib".into(), "tkinter".into()]);

        let report = trim_stdlib(&settings).await.unwrap();

        assert_eq!(report.removed_dirs, 1);
        assert!(python.join("lib/python3.6/ensurepip").is_dir());
    }

    #[tokio::test]
    async fn compiler_diagnostics_abort_before_sources_are_deleted() {
        let tmp = tempfile::tempdir().unwrap();
        let python = portable_python(tmp.path(), FAILING_COMPILEALL);

        let err = trim_stdlib(&TrimSettings::new(&python)).await.unwrap_err();

        match err {
            Error::ToolFailed { stderr, .. } => assert!(stderr.contains("Error compiling")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(python.join("lib/python3.6/os.py").is_file());
    }

    #[tokio::test]
    async fn zips_compiled_library() {
        let tmp = tempfile::tempdir().unwrap();
        let python = portable_python(tmp.path(), FAKE_COMPILEALL);
        let lib = python.join("lib/python3.6");

        let report = trim_stdlib(&TrimSettings::new(&python).with_zip_stdlib(true))
            .await
            .unwrap();

        let archive_path = python.join("lib/python36.zip");
        assert_eq!(report.archive.as_deref(), Some(archive_path.as_path()));
        let archive = zip::ZipArchive::new(std::fs::File::open(&archive_path).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.iter().any(|n| n.ends_with("os.pyc")));
        assert!(!names.iter().any(|n| n.contains("_ssl.so")));

        assert!(!lib.join("os.pyc").exists());
        assert!(!lib.join("json").exists());
        assert!(lib.join("lib-dynload/_ssl.so").is_file());
    }

    #[tokio::test]
    async fn requires_interpreter() {
        let tmp = tempfile::tempdir().unwrap();
        let python = portable_python(tmp.path(), FAKE_COMPILEALL);
        std::fs::remove_file(python.join("bin/python3.6")).unwrap();

        let err = trim_stdlib(&TrimSettings::new(&python)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "interpreter", .. }));
        assert!(python.join("lib/python3.6/idlelib").is_dir());
    }

    #[tokio::test]
    async fn removal_list_cannot_leave_the_library() {
        let tmp = tempfile::tempdir().unwrap();
        let python = portable_python(tmp.path(), FAKE_COMPILEALL);
        let victim = tmp.path().join("victim");
        std::fs::create_dir_all(&victim).unwrap();

        for entry in [victim.display().to_string(), "../../../victim".to_string(), "json/../..".to_string(), String::new()] {
            let settings = TrimSettings::new(&python).with_remove_dirs(vec!["idlelib".into(), entry.clone()]);

            let err = trim_stdlib(&settings).await.unwrap_err();

            assert!(matches!(err, Error::OutsideRoot { .. }), "{entry:?} was accepted");
            assert!(victim.is_dir());
            assert!(python.join("lib/python3.6/idlelib").is_dir());
            assert!(python.join("lib/python3.6/os.py").is_file());
        }
    }

    #[tokio::test]
    async fn nested_removal_paths_are_allowed() {
        let tmp = tempfile::tempdir().unwrap();
        let python = portable_python(tmp.path(), FAKE_COMPILEALL);

        let removed = remove_unneeded_dirs(&python.join("lib/python3.6"), &["json/__pycache__".to_string()])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(python.join("lib/python3.6/json").is_dir());
    }
}
