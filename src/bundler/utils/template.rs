//! Handlebars rendering for help-resource files.
//!
//! Rendering is strict (unknown variables are errors). Substituted values
//! are escaped for the file they land in: XML character references for
//! property lists, single-quoting for shell scripts. Files that are not
//! UTF-8 or carry no `{{` markers are copied byte for byte.

use crate::bundler::error::{ErrorExt, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

/// How substituted values are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// `&`, `<`, `>` and quotes become character references.
    Xml,
    /// Values become single POSIX shell words.
    Shell,
}

/// Renders `source` with `data`.
pub fn render_str<T: Serialize>(source: &str, data: &T, escape: Escape) -> Result<String> {
    let mut handlebars = Handlebars::new();
    match escape {
        Escape::Xml => handlebars.register_escape_fn(handlebars::html_escape),
        Escape::Shell => handlebars.register_escape_fn(shell_quote),
    }
    handlebars.set_strict_mode(true);
    Ok(handlebars.render_template(source, data)?)
}

/// Reads the file at `template`, renders it if it is a template and writes
/// the result to `dest`.
pub async fn render_file<T: Serialize>(
    template: &Path,
    dest: &Path,
    data: &T,
    escape: Escape,
) -> Result<()> {
    let bytes = tokio::fs::read(template)
        .await
        .fs_context("read template", template)?;

    let output = match std::str::from_utf8(&bytes) {
        Ok(source) if source.contains("{{") => render_str(source, data, escape)?.into_bytes(),
        _ => {
            log::debug!("{} has no template markers, copying as is", template.display());
            bytes
        }
    };

    tokio::fs::write(dest, output)
        .await
        .fs_context("write rendered template to", dest)?;
    Ok(())
}

/// Quotes `value` as one shell word. Plain words are left bare.
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+' | '/' | ',' | ':' | '@'));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
