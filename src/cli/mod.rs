//! Command line interface for the portable bundler.
//!
//! Parses arguments, sets up logging, merges the optional config file and
//! dispatches to one of the subcommands in [`commands`].

mod args;
pub mod commands;
mod output;

pub use args::{Args, BundleArgs, Command, RuntimeConfig, SmokeArgs, TrimArgs};
pub use output::OutputManager;

use crate::config::{self, FileConfig};
use crate::error::{BundlerError, CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(&args);

    validate_args(&args).map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;

    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => FileConfig::default(),
    };
    let runtime_config = create_runtime_config(&args);

    match &args.command {
        Command::Bundle(bundle) => commands::bundle(bundle, &file_config, &runtime_config).await,
        Command::Trim(trim) => commands::trim(trim, &file_config, &runtime_config).await,
        Command::SmokeTest(smoke) => commands::smoke_test(smoke, &file_config, &runtime_config).await,
    }
}

/// `RUST_LOG` wins; otherwise `-v` means debug, `-q` means warn, and the
/// default is info.
fn init_logging(args: &Args) {
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else if args.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .try_init();
}

/// Validate arguments without executing (for testing)
pub fn validate_args(args: &Args) -> std::result::Result<(), String> {
    args.validate()
}

/// Create runtime configuration from arguments
pub fn create_runtime_config(args: &Args) -> RuntimeConfig {
    RuntimeConfig::from(args)
}
