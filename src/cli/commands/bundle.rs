//! `bundle` subcommand.

use super::require_dir;
use crate::bundler::{BundleSettingsBuilder, bundle_project};
use crate::cli::{BundleArgs, RuntimeConfig};
use crate::config::FileConfig;
use crate::error::{BundlerError, CliError, Result};
use std::path::PathBuf;

/// Directory of help resources shipped next to the executable.
const RESOURCES_DIR_NAME: &str = "app_bundle";

/// Assembles and optionally compresses the bundle.
pub async fn bundle(args: &BundleArgs, config: &FileConfig, runtime: &RuntimeConfig) -> Result<i32> {
    let python_dir = require_dir(&args.python_dir)?;
    let resources = resolve_resources(args, config)?;
    runtime.verbose_println(&format!("Help resources: {}", resources.display()))?;
    log::info!("\"{}\" name will be used for the app bundle", args.bundle_name);

    let mut builder = BundleSettingsBuilder::new()
        .bundle_name(&args.bundle_name)
        .python_dir(&python_dir)
        .resources_dir(&resources)
        .compress(!args.no_compress && config.bundle.compress.unwrap_or(true));

    if let Some(dir) = args.output_dir.as_ref().or(config.bundle.output_dir.as_ref()) {
        builder = builder.output_dir(dir);
    }
    if let Some(version) = args
        .python_version
        .as_deref()
        .or(config.python_version.as_deref())
    {
        builder = builder.python_version(version);
    }
    if let Some(id) = args.identifier.as_deref().or(config.bundle.identifier.as_deref()) {
        builder = builder.identifier(id);
    }
    let settings = builder.build()?;

    runtime.section(&format!("Creating the App Bundle for \"{}\"", settings.bundle_name()))?;
    let artifacts = bundle_project(&settings).await?;

    for artifact in &artifacts {
        runtime.success(&format!("{}: {}", artifact.kind, artifact.path.display()))?;
        runtime.indent(&format!("size: {} bytes", artifact.size))?;
        runtime.indent(&format!("sha256: {}", artifact.checksum))?;
    }
    runtime.success("All done!")?;
    Ok(0)
}

/// Command line, then config file, then `app_bundle` next to the
/// executable, then `app_bundle` in the current directory.
fn resolve_resources(args: &BundleArgs, config: &FileConfig) -> Result<PathBuf> {
    if let Some(dir) = args.resources.as_ref().or(config.bundle.resources.as_ref()) {
        return Ok(dir.clone());
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(RESOURCES_DIR_NAME)));
    let candidates = beside_exe
        .into_iter()
        .chain(std::iter::once(PathBuf::from(RESOURCES_DIR_NAME)));

    for candidate in candidates {
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Err(BundlerError::Cli(CliError::MissingArgument {
        argument: "--resources".to_string(),
    }))
}
