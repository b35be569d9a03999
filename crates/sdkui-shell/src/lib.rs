#![allow(clippy::missing_errors_doc)]

mod config;
mod profiles;

pub use config::{ConfigError, ShellConfig, ShellConfigEdit};
pub use profiles::{ProfileFile, ProfileOutcome, ProfileStatus, ensure_profile_snippets};
