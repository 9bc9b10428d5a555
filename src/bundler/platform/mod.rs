//! Platform bundle formats.

pub mod macos;
