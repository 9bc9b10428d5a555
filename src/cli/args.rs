//! Command line argument parsing and validation.

use crate::bundler::utils::fs::is_contained_relative;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Packaging tools for a portable Python interpreter
#[derive(Parser, Debug)]
#[command(
    name = "portable_bundler",
    version,
    about = "Packaging tools for a portable Python interpreter",
    long_about = "Builds a macOS application bundle around a portable Python interpreter,
trims its standard library down to precompiled bytecode, and launches a GUI
smoke test inside an assembled bundle.

Usage:
  portable_bundler trim build/python
  portable_bundler bundle build/python MyApp --resources app_bundle
  portable_bundler smoke-test MyApp.app

Exit code 0 = every requested artifact exists."
)]
pub struct Args {
    /// Show detailed output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML file with defaults for unset options
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "PORTABLE_BUNDLER_CONFIG"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble `<NAME>.app` around a portable interpreter and zip it
    Bundle(BundleArgs),

    /// Strip, precompile and optionally zip the standard library
    Trim(TrimArgs),

    /// Launch the GUI smoke test of an assembled bundle
    SmokeTest(SmokeArgs),
}

/// Arguments for `bundle`.
#[derive(clap::Args, Debug)]
pub struct BundleArgs {
    /// Portable interpreter tree to embed
    #[arg(value_name = "PYTHON_DIR")]
    pub python_dir: PathBuf,

    /// Name of the bundle (creates `<NAME>.app`)
    #[arg(value_name = "NAME")]
    pub bundle_name: String,

    /// Directory holding Info.plist, appIcon.icns, run.sh and pyqt_test.py
    #[arg(long, value_name = "DIR", env = "PORTABLE_BUNDLER_RESOURCES")]
    pub resources: Option<PathBuf>,

    /// Where to create the bundle and archive (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Interpreter version tag, e.g. python3.6
    #[arg(long, value_name = "VERSION")]
    pub python_version: Option<String>,

    /// CFBundleIdentifier (default: org.portable.<name>)
    #[arg(long, value_name = "ID")]
    pub identifier: Option<String>,

    /// Skip zipping the finished bundle
    #[arg(long)]
    pub no_compress: bool,
}

/// Arguments for `trim`.
#[derive(clap::Args, Debug)]
pub struct TrimArgs {
    /// Portable interpreter tree (contains bin/ and lib/)
    #[arg(value_name = "PYTHON_DIR")]
    pub python_dir: PathBuf,

    /// Interpreter version tag, e.g. python3.6
    #[arg(long, value_name = "VERSION")]
    pub python_version: Option<String>,

    /// Interpreter used to compile (default: <PYTHON_DIR>/bin/<VERSION>)
    #[arg(long, value_name = "PATH")]
    pub interpreter: Option<PathBuf>,

    /// Standard-library directory to delete; repeat to replace the default list
    #[arg(long = "remove-dir", value_name = "DIR")]
    pub remove_dirs: Vec<String>,

    /// Zip the compiled library next to it
    #[arg(long)]
    pub zip_stdlib: bool,
}

/// Arguments for `smoke-test`.
#[derive(clap::Args, Debug)]
pub struct SmokeArgs {
    /// Assembled `.app` directory
    #[arg(value_name = "APP")]
    pub app_path: PathBuf,

    /// Interpreter version tag, e.g. python3.6
    #[arg(long, value_name = "VERSION")]
    pub python_version: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Bundle(args) => {
                if args.bundle_name.trim().is_empty() {
                    return Err("Bundle name cannot be empty".to_string());
                }
                check_version(args.python_version.as_deref())
            }
            Command::Trim(args) => {
                if let Some(dir) = args
                    .remove_dirs
                    .iter()
                    .find(|d| !is_contained_relative(Path::new(d)))
                {
                    return Err(format!(
                        "--remove-dir {dir:?} must be a relative path inside the standard library"
                    ));
                }
                check_version(args.python_version.as_deref())
            }
            Command::SmokeTest(args) => check_version(args.python_version.as_deref()),
        }
    }
}

fn check_version(version: Option<&str>) -> Result<(), String> {
    match version {
        Some(v) if v.is_empty() || v.contains(['/', '\\']) => {
            Err(format!("Invalid python version tag: {v:?}"))
        }
        _ => Ok(()),
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
