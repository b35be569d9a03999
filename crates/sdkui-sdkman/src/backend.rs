use async_trait::async_trait;
use log::{debug, warn};
use std::path::PathBuf;

use sdkui_backend::{BackendError, BackendInfo, VersionManager, VersionRecord, local_map, reconcile};
use sdkui_core::fetch_candidate_versions;

use crate::client::SdkmanClient;
use crate::version::ListingShape;

/// Where the remote half of a version list comes from when the installed
/// listing is reconciled against the SDKMAN versions API.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub http: reqwest::Client,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct SdkmanBackend {
    info: BackendInfo,
    client: SdkmanClient,
    candidates: Vec<String>,
    catalog: Option<CatalogSource>,
}

impl SdkmanBackend {
    #[must_use]
    pub fn new(client: SdkmanClient, version: Option<String>) -> Self {
        Self {
            info: BackendInfo {
                name: "sdkman",
                path: client.init_script(),
                version,
                data_dir: Some(client.sdkman_dir().to_path_buf()),
            },
            client,
            candidates: Vec::new(),
            catalog: None,
        }
    }

    /// Restrict the menu to these candidates instead of everything `sdk list`
    /// knows about.
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: CatalogSource) -> Self {
        self.catalog = Some(catalog);
        self
    }

    async fn reconcile_with_catalog(
        &self,
        catalog: &CatalogSource,
        candidate: &str,
        listed: Vec<VersionRecord>,
    ) -> Vec<VersionRecord> {
        let remote = match fetch_candidate_versions(&catalog.http, &catalog.base_url, candidate).await
        {
            Ok(remote) => remote,
            Err(e) => {
                warn!("Falling back to sdk list output for {candidate}: {e}");
                return listed;
            }
        };

        let (local, available): (Vec<_>, Vec<_>) =
            listed.into_iter().partition(VersionRecord::installed);
        debug!(
            "{candidate}: {} catalog versions, {} installed, {} listed as available",
            remote.len(),
            local.len(),
            available.len()
        );

        let local = local_map(local);
        let mut merged = reconcile(remote.as_slice(), &local);

        // Installed versions the catalog no longer publishes stay visible.
        let mut stray: Vec<VersionRecord> = local
            .into_values()
            .filter(|record| !remote.iter().any(|id| id == record.identifier()))
            .collect();
        stray.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        merged.extend(stray);
        merged
    }
}

#[async_trait]
impl VersionManager for SdkmanBackend {
    fn name(&self) -> &'static str {
        "sdkman"
    }

    fn backend_info(&self) -> &BackendInfo {
        &self.info
    }

    async fn candidates(&self) -> Result<Vec<String>, BackendError> {
        if !self.candidates.is_empty() {
            return Ok(self.candidates.clone());
        }
        debug!("sdkman: listing candidates");
        self.client.list_candidates().await
    }

    async fn list_versions(&self, candidate: &str) -> Result<Vec<VersionRecord>, BackendError> {
        debug!("sdkman: listing versions of {candidate}");
        let listing = self.client.list(candidate).await?;

        match (&self.catalog, listing.shape) {
            (Some(catalog), ListingShape::Annotated) => Ok(self
                .reconcile_with_catalog(catalog, candidate, listing.records)
                .await),
            _ => Ok(listing.records),
        }
    }

    async fn install(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        self.client.install(candidate, version).await
    }

    async fn set_default(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        self.client.set_default(candidate, version).await
    }

    async fn uninstall(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        self.client.uninstall(candidate, version).await
    }

    async fn home_dir(&self, candidate: &str, version: &str) -> Result<PathBuf, BackendError> {
        self.client.home(candidate, version).await
    }

    async fn tool_version(&self) -> Result<String, BackendError> {
        self.client.version().await
    }

    async fn self_update(&self) -> Result<String, BackendError> {
        self.client.update().await
    }
}
