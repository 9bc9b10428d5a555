//! External tool detection and availability checking.
//!
//! The archiver is optional: when `zip` is not on `PATH` the in-process
//! writer is used instead.

use std::path::PathBuf;
use std::sync::LazyLock;

/// Location of the `zip` command line tool, if installed.
///
/// Cached result to avoid repeated PATH lookups.
pub static ZIP_TOOL: LazyLock<Option<PathBuf>> = LazyLock::new(|| find_tool("zip"));

/// Looks `name` up on `PATH`.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => {
            log::debug!("Found {} at: {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", name, e);
            None
        }
    }
}
