//! Error types for bundling and trimming operations.

use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error as DeriveError;

/// Result type for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by file-system steps and external tools.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Plain IO error without path information.
    #[error("`{0}`")]
    IoError(#[from] io::Error),

    /// IO error annotated with the operation and the path involved.
    #[error("failed to {context} {path}: {error}")]
    Fs {
        context: &'static str,
        path: PathBuf,
        error: io::Error,
    },

    /// A path that must be created is already present.
    #[error("{kind} already exists: {path}")]
    AlreadyExists { kind: &'static str, path: PathBuf },

    /// A path that must be present is missing.
    #[error("{kind} not found: {path}")]
    NotFound { kind: &'static str, path: PathBuf },

    /// A configured relative path would leave the directory it belongs to.
    #[error("{kind} must be a plain relative path inside {root}: {path}")]
    OutsideRoot {
        kind: &'static str,
        root: PathBuf,
        path: PathBuf,
    },

    /// An external tool exited unsuccessfully or wrote to stderr.
    #[error("`{tool}` failed ({status}):\n{stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Archive writer failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A walked path was not under its root.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

/// Attach a message to an error or a missing value.
pub trait Context<T> {
    /// Wraps the error with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Wraps the error with a lazily built context.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Attach a path to raw IO errors.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
