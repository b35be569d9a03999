use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend_kind::BackendKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    #[serde(default = "default_true")]
    pub install_missing_backends: bool,

    #[serde(default = "default_true")]
    pub update_shell_profiles: bool,

    #[serde(
        default = "default_enabled_backends",
        deserialize_with = "deserialize_backend_list"
    )]
    pub enabled_backends: Vec<BackendKind>,

    #[serde(default)]
    pub sdkman_dir: Option<PathBuf>,

    #[serde(default)]
    pub nvm_dir: Option<PathBuf>,

    /// SDKMAN candidates shown in the menu; empty means all of them.
    #[serde(default)]
    pub candidates: Vec<String>,

    #[serde(default = "default_listing_concurrency")]
    pub listing_concurrency: usize,

    #[serde(default)]
    pub sdkman_version_source: VersionSource,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

/// Where the available half of an SDKMAN version list comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    #[default]
    Listing,
    Catalog,
}

fn default_true() -> bool {
    true
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_enabled_backends() -> Vec<BackendKind> {
    BackendKind::ALL.to_vec()
}

fn default_listing_concurrency() -> usize {
    4
}

fn default_http_timeout() -> u64 {
    10
}

fn deserialize_backend_list<'de, D>(deserializer: D) -> Result<Vec<BackendKind>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut kinds = Vec::with_capacity(raw.len());
    for name in raw {
        match BackendKind::from_name(&name) {
            Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
            Some(_) => {}
            None => log::warn!("Ignoring unknown backend in settings: {name}"),
        }
    }
    Ok(kinds)
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            notifications_enabled: true,
            install_missing_backends: true,
            update_shell_profiles: true,
            enabled_backends: default_enabled_backends(),
            sdkman_dir: None,
            nvm_dir: None,
            candidates: Vec::new(),
            listing_concurrency: default_listing_concurrency(),
            sdkman_version_source: VersionSource::default(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl AppSettings {
    /// Read settings from `path`; a missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Failed to read settings {}: {e}", path.display());
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Invalid settings file {}, using defaults: {e}", path.display());
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }

    pub fn is_enabled(&self, backend: BackendKind) -> bool {
        self.enabled_backends.contains(&backend)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AppSettings, BackendKind, VersionSource};

    #[test]
    fn defaults_enable_everything_and_use_listing_source() {
        let settings = AppSettings::default();

        assert!(settings.notifications_enabled);
        assert!(settings.install_missing_backends);
        assert!(settings.update_shell_profiles);
        assert!(!settings.debug_logging);
        assert_eq!(settings.enabled_backends, BackendKind::ALL.to_vec());
        assert!(settings.candidates.is_empty());
        assert_eq!(settings.listing_concurrency, 4);
        assert_eq!(settings.sdkman_version_source, VersionSource::Listing);
        assert_eq!(settings.http_timeout_secs, 10);
        assert_eq!(settings.max_log_size_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings: AppSettings = serde_json::from_value(json!({
            "candidates": ["java", "maven"],
            "sdkman_version_source": "catalog"
        }))
        .expect("settings JSON should deserialize");

        assert_eq!(settings.candidates, vec!["java", "maven"]);
        assert_eq!(settings.sdkman_version_source, VersionSource::Catalog);
        assert!(settings.notifications_enabled);
        assert_eq!(settings.enabled_backends, BackendKind::ALL.to_vec());
    }

    #[test]
    fn enabled_backends_ignore_unknown_and_duplicate_names() {
        let settings: AppSettings = serde_json::from_value(json!({
            "enabled_backends": ["nvm", "volta", "nvm"]
        }))
        .expect("settings JSON should deserialize");

        assert_eq!(settings.enabled_backends, vec![BackendKind::Nvm]);
        assert!(settings.is_enabled(BackendKind::Nvm));
        assert!(!settings.is_enabled(BackendKind::Sdkman));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = dir.path().join("config").join("settings.json");
        let settings = AppSettings {
            notifications_enabled: false,
            sdkman_dir: Some(dir.path().join("sdkman")),
            listing_concurrency: 8,
            ..AppSettings::default()
        };

        settings.save_to(&path).expect("settings should save");
        let loaded = AppSettings::load_from(&path);

        assert!(!loaded.notifications_enabled);
        assert_eq!(loaded.sdkman_dir, Some(dir.path().join("sdkman")));
        assert_eq!(loaded.listing_concurrency, 8);
    }

    #[test]
    fn invalid_or_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = dir.path().join("settings.json");

        assert_eq!(AppSettings::load_from(&path).listing_concurrency, 4);

        std::fs::write(&path, "{ not json").expect("write broken settings");
        let loaded = AppSettings::load_from(&path);
        assert!(loaded.install_missing_backends);
    }
}
