//! App bundle settings.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Settings for assembling `<Name>.app`.
///
/// Constructed via [`BundleSettingsBuilder`](super::BundleSettingsBuilder).
#[derive(Clone, Debug)]
pub struct BundleSettings {
    /// Bundle name; the app becomes `<bundle_name>.app`.
    pub(super) bundle_name: String,

    /// Portable interpreter tree copied into `Contents/Resources`.
    pub(super) python_dir: PathBuf,

    /// Directory holding `Info.plist`, `appIcon.icns`, `run.sh` and the
    /// smoke-test script.
    pub(super) resources_dir: PathBuf,

    /// Where `<Name>.app` and the zip are created.
    pub(super) output_dir: PathBuf,

    /// Interpreter executable name under `bin/`.
    pub(super) python_version: String,

    /// `CFBundleIdentifier` value.
    pub(super) identifier: String,

    /// Whether to produce `<name>-portable.zip`.
    pub(super) compress: bool,
}

/// Variables available to the `Info.plist` and `run.sh` templates.
#[derive(Debug, Serialize)]
pub struct TemplateContext<'a> {
    pub bundle_name: &'a str,
    pub executable_name: &'a str,
    pub python_dir_name: String,
    pub python_version: &'a str,
    pub bundle_identifier: &'a str,
}

impl BundleSettings {
    /// Returns the bundle name.
    pub fn bundle_name(&self) -> &str {
        &self.bundle_name
    }

    /// Returns the interpreter tree to embed.
    pub fn python_dir(&self) -> &Path {
        &self.python_dir
    }

    /// Returns the help-resources directory.
    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the interpreter version tag (e.g. `python3.6`).
    pub fn python_version(&self) -> &str {
        &self.python_version
    }

    /// Returns the bundle identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns whether the bundle is compressed after assembly.
    pub fn compress(&self) -> bool {
        self.compress
    }

    /// Name of the interpreter directory inside `Contents/Resources`.
    pub fn python_dir_name(&self) -> String {
        self.python_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "python".to_string())
    }

    /// Path of the zip produced next to the bundle.
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}-portable.zip", self.bundle_name.to_lowercase()))
    }

    /// Values substituted into the help-resource templates.
    pub fn template_context(&self) -> TemplateContext<'_> {
        TemplateContext {
            bundle_name: &self.bundle_name,
            executable_name: &self.bundle_name,
            python_dir_name: self.python_dir_name(),
            python_version: &self.python_version,
            bundle_identifier: &self.identifier,
        }
    }
}

/// Derives a reverse-DNS identifier from a bundle name.
pub(super) fn default_identifier(bundle_name: &str) -> String {
    let slug: String = bundle_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("org.portable.{}", slug.trim_matches('-'))
}
