//! Portable Bundler - app bundle assembly and standard-library trimming for
//! portable Python builds.
//!
//! Each subcommand runs to completion or aborts; exit code 0 guarantees the
//! requested artifacts exist.

use portable_bundler::cli;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for hint in e.recovery_suggestions() {
                eprintln!("  hint: {}", hint);
            }
            1
        }
    };

    process::exit(exit_code);
}
