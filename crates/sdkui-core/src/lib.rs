//! Network helpers shared by the backends and the tray app.
//!
//! - The SDKMAN versions catalog, used to reconcile local listings against
//!   every published version of a candidate.
//! - Download of the official installer scripts when a tool is missing.

mod catalog;
mod install_script;

/// Versions catalog client and response parsing.
pub use catalog::{CATALOG_BASE_URL, CatalogError, catalog_url, fetch_candidate_versions, parse_catalog};
/// Installer script download helper with retry policy.
pub use install_script::{InstallScriptError, download_install_script, run_install_script};
