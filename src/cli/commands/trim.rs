//! `trim` subcommand.

use super::require_dir;
use crate::bundler::{TrimSettings, trim_stdlib};
use crate::cli::{RuntimeConfig, TrimArgs};
use crate::config::FileConfig;
use crate::error::Result;

/// Trims the standard library of a portable interpreter tree.
pub async fn trim(args: &TrimArgs, config: &FileConfig, runtime: &RuntimeConfig) -> Result<i32> {
    let python_dir = require_dir(&args.python_dir)?;

    let mut settings = TrimSettings::new(&python_dir)
        .with_zip_stdlib(args.zip_stdlib || config.trim.zip_stdlib.unwrap_or(false));
    if let Some(version) = args.python_version.as_deref().or(config.trim_python_version()) {
        settings = settings.with_python_version(version);
    }
    if let Some(interpreter) = args.interpreter.as_ref().or(config.trim.interpreter.as_ref()) {
        settings = settings.with_interpreter(interpreter);
    }
    if !args.remove_dirs.is_empty() {
        settings = settings.with_remove_dirs(args.remove_dirs.clone());
    } else if let Some(dirs) = &config.trim.remove_dirs {
        settings = settings.with_remove_dirs(dirs.clone());
    }

    runtime.section(&format!("Trimming {}", settings.std_lib_path().display()))?;
    runtime.verbose_println(&format!(
        "Compiling with {}",
        settings.interpreter_path().display()
    ))?;
    let report = trim_stdlib(&settings).await?;

    let missing = settings.remove_dirs().len().saturating_sub(report.removed_dirs);
    if missing > 0 {
        runtime.warn(&format!(
            "{missing} of the directories to remove were not present"
        ))?;
    }
    runtime.indent(&format!("directories removed: {}", report.removed_dirs))?;
    runtime.indent(&format!("__pycache__ removed: {}", report.removed_caches))?;
    runtime.indent(&format!("sources removed: {}", report.removed_sources))?;
    if let Some(archive) = &report.archive {
        runtime.success(&format!("archive: {}", archive.display()))?;
    }
    runtime.success("All done!")?;
    Ok(0)
}
