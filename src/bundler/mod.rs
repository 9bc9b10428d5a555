//! Bundle assembly, standard-library trimming and smoke testing.
//!
//! Three independent operations, each a linear sequence of file-system steps
//! and awaited subprocesses:
//!
//! - [`bundle_project`] - build `<Name>.app` around a portable interpreter
//! - [`trim_stdlib`] - strip and precompile the interpreter's standard library
//! - [`run_smoke_test`] - launch the bundled GUI toolkit smoke test
//!
//! # Example
//!
//! ```no_run
//! use portable_bundler::bundler::{BundleSettingsBuilder, bundle_project};
//!
//! # async fn example() -> portable_bundler::bundler::Result<()> {
//! let settings = BundleSettingsBuilder::new()
//!     .bundle_name("MyApp")
//!     .python_dir("build/python")
//!     .resources_dir("app_bundle")
//!     .build()?;
//!
//! for artifact in bundle_project(&settings).await? {
//!     println!("{}: {} ({} bytes)", artifact.kind, artifact.path.display(), artifact.size);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod stdlib;
pub mod utils;

pub use builder::{ArtifactKind, BundledArtifact};
pub use error::{Error, Result};
pub use platform::macos::{BundleLayout, SmokeTest, bundle_project, run_smoke_test};
pub use settings::{BundleSettings, BundleSettingsBuilder, TrimSettings};
pub use stdlib::{TrimReport, trim_stdlib};
