//! Builder for constructing BundleSettings.

use super::{BundleSettings, DEFAULT_PYTHON_VERSION, bundle::default_identifier};
use crate::bundler::error::{Context, Error, Result};
use std::path::{Path, PathBuf};

/// Builder for constructing [`BundleSettings`].
///
/// # Examples
///
/// ```no_run
/// use portable_bundler::bundler::BundleSettingsBuilder;
///
/// # fn example() -> portable_bundler::bundler::Result<()> {
/// let settings = BundleSettingsBuilder::new()
///     .bundle_name("MyApp")
///     .python_dir("build/python")
///     .resources_dir("app_bundle")
///     .output_dir("dist")
///     .build()?;
/// assert_eq!(settings.archive_path().file_name().unwrap(), "myapp-portable.zip");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct BundleSettingsBuilder {
    bundle_name: Option<String>,
    python_dir: Option<PathBuf>,
    resources_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    python_version: Option<String>,
    identifier: Option<String>,
    compress: Option<bool>,
}

impl BundleSettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the bundle name.
    ///
    /// # Required
    pub fn bundle_name<S: Into<String>>(mut self, name: S) -> Self {
        self.bundle_name = Some(name.into());
        self
    }

    /// Sets the interpreter tree to embed.
    ///
    /// # Required
    pub fn python_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.python_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the help-resources directory.
    ///
    /// # Required
    pub fn resources_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.resources_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: current directory
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the interpreter version tag.
    ///
    /// Default: `python3.6`
    pub fn python_version<S: Into<String>>(mut self, version: S) -> Self {
        self.python_version = Some(version.into());
        self
    }

    /// Sets the bundle identifier.
    ///
    /// Default: `org.portable.<bundle name>`
    pub fn identifier<S: Into<String>>(mut self, identifier: S) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Enables or disables zipping the finished bundle.
    ///
    /// Default: true
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = Some(compress);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `bundle_name`, `python_dir` or `resources_dir` is
    /// missing, or if the bundle name is empty or contains a path separator.
    pub fn build(self) -> Result<BundleSettings> {
        let bundle_name = self.bundle_name.context("bundle_name is required")?;
        if bundle_name.trim().is_empty() {
            return Err(Error::GenericError("bundle name cannot be empty".into()));
        }
        if bundle_name.contains(['/', '\\']) {
            return Err(Error::GenericError(format!(
                "bundle name {bundle_name:?} must not contain path separators"
            )));
        }

        let output_dir = match self.output_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        Ok(BundleSettings {
            identifier: self
                .identifier
                .unwrap_or_else(|| default_identifier(&bundle_name)),
            bundle_name,
            python_dir: self.python_dir.context("python_dir is required")?,
            resources_dir: self.resources_dir.context("resources_dir is required")?,
            output_dir,
            python_version: self
                .python_version
                .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string()),
            compress: self.compress.unwrap_or(true),
        })
    }
}
