//! GUI smoke test for an assembled bundle.
//!
//! Runs the bundled toolkit script with the bundled interpreter. The script
//! prints interpreter and toolkit library paths and opens one window; this
//! side only locates the pieces, reports them and waits for the window to
//! be closed.

use super::layout::BundleLayout;
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    utils::process,
};
use std::path::{Path, PathBuf};

/// Everything needed to launch the smoke test.
#[derive(Debug, Clone)]
pub struct SmokeTest {
    layout: BundleLayout,
    interpreter: PathBuf,
    script: PathBuf,
}

impl SmokeTest {
    /// Locates the bundled interpreter and smoke-test script inside `app_path`.
    ///
    /// The interpreter is the first directory (by name) in
    /// `Contents/Resources` that contains `bin/<python_version>`.
    pub fn locate(app_path: &Path, python_version: &str) -> Result<Self> {
        let layout = BundleLayout::from_root(app_path);
        let resources = layout.resources();
        if !resources.is_dir() {
            return Err(Error::NotFound {
                kind: "app bundle resources",
                path: resources,
            });
        }

        let script = layout.smoke_script();
        if !script.is_file() {
            return Err(Error::NotFound {
                kind: "smoke-test script",
                path: script,
            });
        }

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(&resources).fs_context("read directory", &resources)? {
            let entry = entry.fs_context("read directory", &resources)?;
            let interpreter = entry.path().join("bin").join(python_version);
            if entry.path().is_dir() && interpreter.is_file() {
                candidates.push(interpreter);
            }
        }
        candidates.sort();

        if candidates.len() > 1 {
            log::warn!(
                "Found {} bundled interpreters, using {}",
                candidates.len(),
                candidates[0].display()
            );
        }
        let interpreter = candidates.into_iter().next().ok_or_else(|| Error::NotFound {
            kind: "bundled interpreter",
            path: resources.join("*").join("bin").join(python_version),
        })?;

        Ok(Self {
            layout,
            interpreter,
            script,
        })
    }

    pub fn layout(&self) -> &BundleLayout {
        &self.layout
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Labelled paths shown before the test starts.
    pub fn diagnostics(&self) -> Vec<(&'static str, PathBuf)> {
        let mut lines = vec![("App bundle", self.layout.root().to_path_buf())];
        if let Some(name) = self.layout.bundle_name() {
            lines.push(("Launcher", self.layout.launcher(&name)));
        }
        lines.push(("Resources", self.layout.resources()));
        lines.push(("Interpreter", self.interpreter.clone()));
        lines.push(("Smoke-test script", self.script.clone()));
        lines
    }

    /// Runs the script with the bundled interpreter and waits for it to exit.
    pub async fn run(&self) -> Result<()> {
        log::info!(
            "Running {} with {}",
            self.script.display(),
            self.interpreter.display()
        );
        let resources = self.layout.resources();
        process::run_attached(&self.interpreter, [&self.script], Some(resources.as_path())).await
    }
}

/// Locates and runs the smoke test for the bundle at `app_path`.
pub async fn run_smoke_test(app_path: &Path, python_version: &str) -> Result<SmokeTest> {
    let smoke = SmokeTest::locate(app_path, python_version)?;
    for (label, path) in smoke.diagnostics() {
        log::info!("{}:\n\t{}", label, path.display());
    }
    smoke.run().await?;
    Ok(smoke)
}
