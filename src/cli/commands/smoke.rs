//! `smoke-test` subcommand.

use crate::bundler::{SmokeTest, settings::DEFAULT_PYTHON_VERSION};
use crate::cli::{RuntimeConfig, SmokeArgs};
use crate::config::FileConfig;
use crate::error::Result;

/// Prints where everything is, then runs the bundled GUI script until its
/// window is closed.
pub async fn smoke_test(args: &SmokeArgs, config: &FileConfig, runtime: &RuntimeConfig) -> Result<i32> {
    let version = args
        .python_version
        .as_deref()
        .or(config.python_version.as_deref())
        .unwrap_or(DEFAULT_PYTHON_VERSION);

    let smoke = SmokeTest::locate(&args.app_path, version)?;

    runtime.section("Smoke test")?;
    for (label, path) in smoke.diagnostics() {
        runtime.progress(&format!("{label}:"))?;
        runtime.indent(&path.display().to_string())?;
    }

    smoke.run().await?;
    runtime.success("Smoke test finished")?;
    Ok(0)
}
