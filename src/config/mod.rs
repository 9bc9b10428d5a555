//! Optional TOML configuration file.
//!
//! Values here fill in whatever the command line leaves unset:
//!
//! ```toml
//! [bundle]
//! resources = "app_bundle"
//! identifier = "org.example.viewer"
//! compress = true
//!
//! [trim]
//! python_version = "python3.6"
//! remove_dirs = ["ensurepip", "idlelib", "test"]
//! zip_stdlib = false
//! ```
//!
//! Relative paths are resolved against the file's directory.

use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// `[bundle]` table
    #[serde(default)]
    pub bundle: BundleConfig,

    /// `[trim]` table
    #[serde(default)]
    pub trim: TrimConfig,

    /// Interpreter version tag shared by all subcommands.
    #[serde(default)]
    pub python_version: Option<String>,
}

/// `[bundle]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Help-resources directory.
    #[serde(default)]
    pub resources: Option<PathBuf>,

    /// Output directory for the bundle and archive.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// `CFBundleIdentifier`.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Whether to zip the finished bundle.
    #[serde(default)]
    pub compress: Option<bool>,
}

/// `[trim]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrimConfig {
    /// Interpreter version tag for the trimmer only.
    #[serde(default)]
    pub python_version: Option<String>,

    /// Standard-library subdirectories to delete.
    #[serde(default)]
    pub remove_dirs: Option<Vec<String>>,

    /// Interpreter used for compilation.
    #[serde(default)]
    pub interpreter: Option<PathBuf>,

    /// Whether to zip the compiled library.
    #[serde(default)]
    pub zip_stdlib: Option<bool>,
}

/// Reads and parses the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_config".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let mut config = parse_config(&text)?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parses configuration text without touching the file system.
pub fn parse_config(text: &str) -> Result<FileConfig> {
    Ok(toml::from_str(text)?)
}

impl FileConfig {
    /// Version tag for the trimmer: `[trim]` first, then top level.
    pub fn trim_python_version(&self) -> Option<&str> {
        self.trim
            .python_version
            .as_deref()
            .or(self.python_version.as_deref())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.bundle.resources,
            &mut self.bundle.output_dir,
            &mut self.trim.interpreter,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
