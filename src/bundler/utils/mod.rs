//! Shared helpers used inside individual operations.

pub mod fs;
pub mod process;
pub mod template;
