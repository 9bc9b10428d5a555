//! Running external tools to completion.
//!
//! A tool counts as failed when it exits non-zero *or* writes anything to
//! stderr; archivers and bytecode compilers report per-file problems there
//! while still exiting cleanly.

use crate::bundler::error::{Error, Result};
use std::{
    ffi::OsStr,
    path::Path,
    process::{ExitStatus, Stdio},
};
use tokio::process::Command;

/// Runs `program` with `args` and waits for it to finish.
///
/// Output is captured; stdout is returned and logged at debug level.
/// `cwd` sets the child's working directory without touching ours.
pub async fn run_tool<I, S>(program: &Path, args: I, cwd: Option<&Path>) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    log::debug!("Running {:?}", command.as_std());

    let output = command.output().await.map_err(|e| {
        Error::GenericError(format!("Failed to execute {}: {}", program.display(), e))
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() || !stderr.is_empty() {
        return Err(Error::ToolFailed {
            tool: program.display().to_string(),
            status: describe_status(output.status),
            stderr,
        });
    }

    for line in stdout.lines() {
        log::debug!("{}: {}", tool_name(program), line);
    }

    Ok(stdout)
}

/// Runs `program` with inherited stdio and waits for it to finish.
///
/// Used where the child talks to the user directly (diagnostic prints, GUI).
pub async fn run_attached<I, S>(program: &Path, args: I, cwd: Option<&Path>) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    log::debug!("Running {:?}", command.as_std());

    let status = command.status().await.map_err(|e| {
        Error::GenericError(format!("Failed to execute {}: {}", program.display(), e))
    })?;

    if !status.success() {
        return Err(Error::ToolFailed {
            tool: program.display().to_string(),
            status: describe_status(status),
            stderr: String::from("(stderr was attached to the terminal)"),
        });
    }
    Ok(())
}

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(0) => "exit code 0 with stderr output".to_string(),
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
