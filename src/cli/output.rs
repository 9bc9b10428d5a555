//! Colored terminal output for the CLI.
//!
//! Progress and results go to stdout, warnings to stderr. Color is used only
//! when the stream is a terminal (and `NO_COLOR`/`TERM=dumb` are honored by
//! `termcolor`). Log records from the library go through `env_logger`.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prints command output subject to `--verbose` / `--quiet`.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Prints only with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            let mut spec = ColorSpec::new();
            spec.set_dimmed(true);
            write_line(&mut stdout().lock(), &spec, "", message)?;
        }
        Ok(())
    }

    /// Prints a warning to stderr unless quiet.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(Color::Yellow)).set_bold(true);
            write_line(&mut stderr().lock(), &spec, "warning:", message)?;
        }
        Ok(())
    }

    /// Prints a success line unless quiet.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(Color::Green)).set_bold(true);
            write_line(&mut stdout().lock(), &spec, "✓", message)?;
        }
        Ok(())
    }

    /// Prints a progress line unless quiet.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(Color::Cyan));
            write_line(&mut stdout().lock(), &spec, "→", message)?;
        }
        Ok(())
    }

    /// Prints a section header unless quiet.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if !self.quiet {
            write_section(&mut stdout().lock(), title)?;
        }
        Ok(())
    }

    /// Prints an indented line unless quiet.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(stdout().lock(), "    {message}")?;
        }
        Ok(())
    }
}

fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(io::stdout().is_terminal()))
}

fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice(io::stderr().is_terminal()))
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Writes `tag` in `spec` followed by the uncolored message.
fn write_line<W: WriteColor>(out: &mut W, spec: &ColorSpec, tag: &str, message: &str) -> io::Result<()> {
    out.set_color(spec)?;
    if tag.is_empty() {
        write!(out, "{message}")?;
        out.reset()?;
        return writeln!(out);
    }
    write!(out, "{tag}")?;
    out.reset()?;
    writeln!(out, " {message}")
}

fn write_section<W: WriteColor>(out: &mut W, title: &str) -> io::Result<()> {
    let mut spec = ColorSpec::new();
    spec.set_bold(true).set_underline(true);
    writeln!(out)?;
    out.set_color(&spec)?;
    write!(out, "{title}")?;
    out.reset()?;
    writeln!(out)
}
