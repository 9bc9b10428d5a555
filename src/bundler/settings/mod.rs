//! Configuration structures for bundling and trimming operations.
//!
//! [`BundleSettings`] drives the app bundle assembler and is built with
//! [`BundleSettingsBuilder`]; [`TrimSettings`] drives the standard-library
//! trimmer.

mod builder;
mod bundle;
mod trim;

pub use builder::BundleSettingsBuilder;
pub use bundle::{BundleSettings, TemplateContext};
pub use trim::TrimSettings;

/// Interpreter directory and executable name used by portable builds.
pub const DEFAULT_PYTHON_VERSION: &str = "python3.6";

/// Standard-library subdirectories that are safe to drop from a portable build.
pub const DEFAULT_REMOVE_DIRS: &[&str] = &["ensurepip", "idlelib", "test"];

/// Standard-library entries that cannot be loaded from a zip archive and are
/// kept on disk when the library is compressed.
pub const ZIP_KEEP_DIRS: &[&str] = &["lib-dynload", "site-packages"];
