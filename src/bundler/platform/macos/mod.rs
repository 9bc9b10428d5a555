//! macOS application bundles.
//!
//! - `layout` - the fixed `Contents/` directory structure
//! - `app` - assembling `<Name>.app` around a portable interpreter
//! - `smoke` - launching the bundled GUI toolkit smoke test

pub mod app;
pub mod layout;
pub mod smoke;

pub use app::{bundle_project, create_app_bundle};
pub use layout::BundleLayout;
pub use smoke::{SmokeTest, run_smoke_test};
