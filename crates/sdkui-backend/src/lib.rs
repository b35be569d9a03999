//! Version records and the contract every version-manager backend implements.
//!
//! The parsing, ordering and reconciliation helpers here are pure functions of
//! their input so each backend only has to decide which command to run and
//! which shape its output has.

mod error;
mod parse;
mod reconcile;
mod runner;
mod traits;
mod types;

pub use error::BackendError;
pub use parse::{is_report_chrome, parse_annotated, parse_tabular, strip_ansi};
pub use reconcile::{local_map, reconcile};
pub use runner::ScriptRunner;
pub use traits::{BackendDetection, BackendInfo, BackendProvider, VersionManager};
pub use types::{VersionKey, VersionRecord, compare_records, sort_records};
