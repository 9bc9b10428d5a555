//! Standard-library trimmer settings.

use super::{DEFAULT_PYTHON_VERSION, DEFAULT_REMOVE_DIRS};
use std::path::{Path, PathBuf};

/// Settings for trimming a portable interpreter tree.
#[derive(Clone, Debug)]
pub struct TrimSettings {
    python_dir: PathBuf,
    python_version: String,
    remove_dirs: Vec<String>,
    interpreter: Option<PathBuf>,
    zip_stdlib: bool,
}

impl TrimSettings {
    /// Settings with the default version tag and removal list.
    pub fn new<P: AsRef<Path>>(python_dir: P) -> Self {
        Self {
            python_dir: python_dir.as_ref().to_path_buf(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            remove_dirs: DEFAULT_REMOVE_DIRS.iter().map(|d| d.to_string()).collect(),
            interpreter: None,
            zip_stdlib: false,
        }
    }

    /// Sets the interpreter version tag.
    pub fn with_python_version<S: Into<String>>(mut self, version: S) -> Self {
        self.python_version = version.into();
        self
    }

    /// Replaces the list of standard-library subdirectories to delete.
    pub fn with_remove_dirs(mut self, dirs: Vec<String>) -> Self {
        self.remove_dirs = dirs;
        self
    }

    /// Uses `interpreter` for bytecode compilation instead of the one in the tree.
    pub fn with_interpreter<P: AsRef<Path>>(mut self, interpreter: P) -> Self {
        self.interpreter = Some(interpreter.as_ref().to_path_buf());
        self
    }

    /// Enables compressing the compiled library into a zip.
    pub fn with_zip_stdlib(mut self, zip_stdlib: bool) -> Self {
        self.zip_stdlib = zip_stdlib;
        self
    }

    /// Returns the interpreter tree root.
    pub fn python_dir(&self) -> &Path {
        &self.python_dir
    }

    /// Returns the version tag.
    pub fn python_version(&self) -> &str {
        &self.python_version
    }

    /// Returns the subdirectories (relative to the library) to delete.
    pub fn remove_dirs(&self) -> &[String] {
        &self.remove_dirs
    }

    /// Returns whether the library is zipped after compilation.
    pub fn zip_stdlib(&self) -> bool {
        self.zip_stdlib
    }

    /// `<python>/lib/<version>`
    pub fn std_lib_path(&self) -> PathBuf {
        self.python_dir.join("lib").join(&self.python_version)
    }

    /// The override if set, otherwise `<python>/bin/<version>`.
    pub fn interpreter_path(&self) -> PathBuf {
        self.interpreter
            .clone()
            .unwrap_or_else(|| self.python_dir.join("bin").join(&self.python_version))
    }

    /// `<python>/lib/python36.zip` for `python3.6`: the archive name the
    /// interpreter puts on its default import path.
    pub fn std_lib_archive_path(&self) -> PathBuf {
        let stem: String = self.python_version.chars().filter(|c| *c != '.').collect();
        self.python_dir.join("lib").join(format!("{stem}.zip"))
    }
}
