//! Top-level error types for the CLI and library entry points.
//!
//! Operation-level failures live in [`crate::bundler::Error`]; this module wraps
//! them together with argument and configuration errors.

use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as Op;

        match self {
            Self::Cli(CliError::InvalidArguments { .. } | CliError::MissingArgument { .. }) => {
                vec!["Run with --help to see the expected arguments".to_string()]
            }
            Self::Toml(_) => vec!["Check the syntax of the configuration file".to_string()],
            Self::Bundler(Op::AlreadyExists { path, .. }) => vec![format!(
                "Remove {} or choose a different bundle name",
                path.display()
            )],
            Self::Bundler(Op::NotFound { kind, .. }) => {
                vec![format!("Make sure the {kind} exists before running again")]
            }
            Self::Bundler(Op::OutsideRoot { .. }) => vec![
                "List directories relative to the standard library, e.g. `test` or `tkinter/test`"
                    .to_string(),
            ],
            Self::Bundler(Op::ToolFailed { tool, .. }) => vec![format!(
                "Run `{tool}` manually to inspect its diagnostics"
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
