//! Fixed directory layout of a `.app` bundle.

use std::path::{Path, PathBuf};

/// Property list copied to `Contents/Info.plist`.
pub const INFO_PLIST: &str = "Info.plist";
/// Icon copied to `Contents/Resources`.
pub const APP_ICON: &str = "appIcon.icns";
/// Launcher template installed as `Contents/MacOS/<Name>`.
pub const LAUNCHER_TEMPLATE: &str = "run.sh";
/// GUI toolkit smoke-test script copied to `Contents/Resources`.
pub const SMOKE_SCRIPT: &str = "pyqt_test.py";

/// Paths inside `<Name>.app`.
///
/// ```text
/// <Name>.app/
///   Contents/
///     Info.plist
///     Frameworks/
///     MacOS/<Name>
///     Resources/
///       appIcon.icns
///       pyqt_test.py
///       <python dir>/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    root: PathBuf,
}

impl BundleLayout {
    /// Layout for `<output_dir>/<bundle_name>.app`.
    pub fn new(output_dir: &Path, bundle_name: &str) -> Self {
        Self {
            root: output_dir.join(format!("{bundle_name}.app")),
        }
    }

    /// Layout for an existing bundle directory.
    pub fn from_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contents(&self) -> PathBuf {
        self.root.join("Contents")
    }

    pub fn frameworks(&self) -> PathBuf {
        self.contents().join("Frameworks")
    }

    pub fn macos(&self) -> PathBuf {
        self.contents().join("MacOS")
    }

    pub fn resources(&self) -> PathBuf {
        self.contents().join("Resources")
    }

    pub fn info_plist(&self) -> PathBuf {
        self.contents().join(INFO_PLIST)
    }

    pub fn icon(&self) -> PathBuf {
        self.resources().join(APP_ICON)
    }

    pub fn smoke_script(&self) -> PathBuf {
        self.resources().join(SMOKE_SCRIPT)
    }

    /// `Contents/MacOS/<executable_name>`
    pub fn launcher(&self, executable_name: &str) -> PathBuf {
        self.macos().join(executable_name)
    }

    /// `Contents/Resources/<python_dir_name>`
    pub fn python_dir(&self, python_dir_name: &str) -> PathBuf {
        self.resources().join(python_dir_name)
    }

    /// Directories created for a new bundle, parents first.
    pub fn skeleton(&self) -> [PathBuf; 5] {
        [
            self.root.clone(),
            self.contents(),
            self.frameworks(),
            self.macos(),
            self.resources(),
        ]
    }

    /// Bundle name derived from the root directory (`Foo.app` -> `Foo`).
    pub fn bundle_name(&self) -> Option<String> {
        self.root
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
    }
}
