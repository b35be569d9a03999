use async_trait::async_trait;
use std::path::PathBuf;

use sdkui_backend::{BackendDetection, BackendError, BackendProvider, VersionManager};

use crate::backend::NvmBackend;
use crate::client::NvmClient;
use crate::detection::{detect_nvm, detect_nvm_dir, install_nvm};

const NVM_SHELL_SNIPPET: &str = r#"export NVM_DIR="$HOME/.nvm"
[ -s "$NVM_DIR/nvm.sh" ] && \. "$NVM_DIR/nvm.sh""#;

#[derive(Default)]
pub struct NvmProvider {
    nvm_dir: Option<PathBuf>,
}

impl NvmProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_nvm_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.nvm_dir = dir;
        self
    }

    fn nvm_dir(&self) -> PathBuf {
        self.nvm_dir.clone().unwrap_or_else(detect_nvm_dir)
    }
}

#[async_trait]
impl BackendProvider for NvmProvider {
    fn name(&self) -> &'static str {
        "nvm"
    }

    fn display_name(&self) -> &'static str {
        "nvm (Node Version Manager)"
    }

    fn shell_config_marker(&self) -> &'static str {
        "export NVM_DIR"
    }

    fn shell_config_label(&self) -> &'static str {
        "nvm (added by sdkui)"
    }

    fn shell_init_snippet(&self) -> String {
        match &self.nvm_dir {
            Some(dir) => NVM_SHELL_SNIPPET.replace("$HOME/.nvm", &dir.display().to_string()),
            None => NVM_SHELL_SNIPPET.to_string(),
        }
    }

    async fn detect(&self) -> BackendDetection {
        let detection = detect_nvm(self.nvm_dir.as_deref()).await;
        let script = detection.nvm_dir.join("nvm.sh");

        BackendDetection {
            found: detection.found,
            path: detection.found.then_some(script),
            version: detection.version,
            data_dir: Some(detection.nvm_dir),
        }
    }

    async fn install_backend(&self) -> Result<(), BackendError> {
        install_nvm(&self.nvm_dir()).await
    }

    fn create_manager(&self, detection: &BackendDetection) -> Box<dyn VersionManager> {
        let nvm_dir = detection.data_dir.clone().unwrap_or_else(|| self.nvm_dir());
        Box::new(NvmBackend::new(
            NvmClient::new(nvm_dir),
            detection.version.clone(),
        ))
    }
}
