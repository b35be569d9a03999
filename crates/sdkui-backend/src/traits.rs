use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::BackendError;
use crate::types::{VersionRecord, sort_records};

#[derive(Debug, Clone, Default)]
pub struct BackendDetection {
    pub found: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub data_dir: Option<PathBuf>,
}

#[async_trait]
pub trait BackendProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    /// Text whose presence in a shell profile means the tool is already
    /// sourced there.
    fn shell_config_marker(&self) -> &str;
    fn shell_config_label(&self) -> &str;
    fn shell_init_snippet(&self) -> String;
    async fn detect(&self) -> BackendDetection;
    async fn install_backend(&self) -> Result<(), BackendError>;
    fn create_manager(&self, detection: &BackendDetection) -> Box<dyn VersionManager>;
}

#[derive(Debug, Clone)]
pub struct BackendInfo {
    pub name: &'static str,
    pub path: PathBuf,
    pub version: Option<String>,
    pub data_dir: Option<PathBuf>,
}

#[async_trait]
pub trait VersionManager: Send + Sync + VersionManagerClone {
    fn name(&self) -> &'static str;

    fn backend_info(&self) -> &BackendInfo;

    /// Candidate families this manager exposes, in menu order.
    async fn candidates(&self) -> Result<Vec<String>, BackendError>;

    /// Every known version of `candidate`, in the manager's listing order.
    async fn list_versions(&self, candidate: &str) -> Result<Vec<VersionRecord>, BackendError>;

    /// Install `version` and make it the default.
    async fn install(&self, candidate: &str, version: &str) -> Result<(), BackendError>;

    /// Make an already installed `version` the default.
    async fn set_default(&self, candidate: &str, version: &str) -> Result<(), BackendError>;

    async fn uninstall(&self, candidate: &str, version: &str) -> Result<(), BackendError>;

    async fn home_dir(&self, candidate: &str, version: &str) -> Result<PathBuf, BackendError>;

    async fn tool_version(&self) -> Result<String, BackendError>;

    /// Refresh the tool's own catalog or installation.
    async fn self_update(&self) -> Result<String, BackendError> {
        Err(BackendError::Unsupported {
            operation: "self_update",
        })
    }

    async fn sorted_versions(&self, candidate: &str) -> Result<Vec<VersionRecord>, BackendError> {
        let mut versions = self.list_versions(candidate).await?;
        sort_records(&mut versions);
        Ok(versions)
    }
}

pub trait VersionManagerClone: Send + Sync {
    fn clone_box(&self) -> Box<dyn VersionManager>;
}

impl<T> VersionManagerClone for T
where
    T: 'static + VersionManager + Clone,
{
    fn clone_box(&self) -> Box<dyn VersionManager> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn VersionManager> {
    fn clone(&self) -> Box<dyn VersionManager> {
        self.clone_box()
    }
}

impl<T: VersionManager + Clone + 'static> From<T> for Box<dyn VersionManager> {
    fn from(manager: T) -> Self {
        Box::new(manager)
    }
}
