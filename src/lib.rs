//! Packaging utilities for shipping a portable Python interpreter in a
//! macOS application bundle.
//!
//! This library provides:
//! - App bundle assembly (`<Name>.app` with `Contents/{Frameworks,MacOS,Resources}`)
//! - Standard-library trimming and bytecode precompilation
//! - A GUI toolkit smoke-test launcher for assembled bundles
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
