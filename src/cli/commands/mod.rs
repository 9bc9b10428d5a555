//! Subcommand implementations.
//!
//! Each command merges its arguments over the config file, calls into
//! [`crate::bundler`] and reports the outcome.

mod bundle;
mod smoke;
mod trim;

pub use bundle::bundle;
pub use smoke::smoke_test;
pub use trim::trim;

use crate::error::{BundlerError, CliError, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Resolves a required directory argument to an absolute path.
pub(crate) fn require_dir(argument: &Path) -> Result<PathBuf> {
    let msg = format!("Command line argument \"{}\" found", argument.display());
    if !argument.is_dir() {
        return Err(BundlerError::Cli(CliError::InvalidArguments {
            reason: format!("{msg}, but it is not a valid path"),
        }));
    }
    let absolute = argument.absolutize()?.into_owned();
    log::info!("{msg} will be used as python path:\n\t{}", absolute.display());
    Ok(absolute)
}
