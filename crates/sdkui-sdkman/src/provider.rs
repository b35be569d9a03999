use async_trait::async_trait;
use std::path::{Path, PathBuf};

use sdkui_backend::{BackendDetection, BackendError, BackendProvider, VersionManager};

use crate::backend::{CatalogSource, SdkmanBackend};
use crate::client::SdkmanClient;
use crate::detection::{detect_sdkman, detect_sdkman_dir, install_sdkman};

#[derive(Default)]
pub struct SdkmanProvider {
    sdkman_dir: Option<PathBuf>,
    candidates: Vec<String>,
    catalog: Option<CatalogSource>,
}

impl SdkmanProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sdkman_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.sdkman_dir = dir;
        self
    }

    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Option<CatalogSource>) -> Self {
        self.catalog = catalog;
        self
    }

    fn sdkman_dir(&self) -> PathBuf {
        self.sdkman_dir.clone().unwrap_or_else(detect_sdkman_dir)
    }
}

fn shell_path(dir: &Path, home: Option<&Path>) -> String {
    match home.and_then(|home| dir.strip_prefix(home).ok()) {
        Some(relative) => format!("$HOME/{}", relative.display()),
        None => dir.display().to_string(),
    }
}

#[async_trait]
impl BackendProvider for SdkmanProvider {
    fn name(&self) -> &'static str {
        "sdkman"
    }

    fn display_name(&self) -> &'static str {
        "SDKMAN"
    }

    fn shell_config_marker(&self) -> &'static str {
        "SDKMAN_DIR"
    }

    fn shell_config_label(&self) -> &'static str {
        "SDKMAN (added by sdkui)"
    }

    fn shell_init_snippet(&self) -> String {
        let dir = shell_path(&self.sdkman_dir(), dirs::home_dir().as_deref());
        format!(
            "export SDKMAN_DIR=\"{dir}\"\n[ -s \"$SDKMAN_DIR/bin/sdkman-init.sh\" ] && . \"$SDKMAN_DIR/bin/sdkman-init.sh\""
        )
    }

    async fn detect(&self) -> BackendDetection {
        let detection = detect_sdkman(self.sdkman_dir.as_deref()).await;
        let init_script = detection.sdkman_dir.join("bin").join("sdkman-init.sh");

        BackendDetection {
            found: detection.found,
            path: detection.found.then_some(init_script),
            version: detection.version,
            data_dir: Some(detection.sdkman_dir),
        }
    }

    async fn install_backend(&self) -> Result<(), BackendError> {
        install_sdkman(&self.sdkman_dir()).await
    }

    fn create_manager(&self, detection: &BackendDetection) -> Box<dyn VersionManager> {
        let dir = detection.data_dir.clone().unwrap_or_else(|| self.sdkman_dir());
        let mut backend = SdkmanBackend::new(SdkmanClient::new(dir), detection.version.clone())
            .with_candidates(self.candidates.clone());
        if let Some(catalog) = &self.catalog {
            backend = backend.with_catalog(catalog.clone());
        }
        Box::new(backend)
    }
}
