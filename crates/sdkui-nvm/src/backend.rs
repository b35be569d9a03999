use async_trait::async_trait;
use log::{debug, warn};
use std::path::PathBuf;

use sdkui_backend::{BackendError, BackendInfo, VersionManager, VersionRecord, local_map, reconcile};

use crate::client::NvmClient;

/// nvm manages a single candidate family.
pub const NODE_CANDIDATE: &str = "node";

#[derive(Debug, Clone)]
pub struct NvmBackend {
    info: BackendInfo,
    client: NvmClient,
}

impl NvmBackend {
    #[must_use]
    pub fn new(client: NvmClient, version: Option<String>) -> Self {
        Self {
            info: BackendInfo {
                name: "nvm",
                path: client.nvm_script(),
                version,
                data_dir: Some(client.nvm_dir().to_path_buf()),
            },
            client,
        }
    }

    fn check_candidate(candidate: &str) -> Result<(), BackendError> {
        if candidate == NODE_CANDIDATE {
            Ok(())
        } else {
            Err(BackendError::Unsupported {
                operation: "non-node candidate",
            })
        }
    }
}

#[async_trait]
impl VersionManager for NvmBackend {
    fn name(&self) -> &'static str {
        "nvm"
    }

    fn backend_info(&self) -> &BackendInfo {
        &self.info
    }

    async fn candidates(&self) -> Result<Vec<String>, BackendError> {
        Ok(vec![NODE_CANDIDATE.to_string()])
    }

    async fn list_versions(&self, candidate: &str) -> Result<Vec<VersionRecord>, BackendError> {
        Self::check_candidate(candidate)?;
        debug!("nvm: listing installed and remote versions");

        let (installed, remote) =
            tokio::join!(self.client.list_installed(), self.client.list_remote());
        let installed = installed?;

        match remote {
            Ok(remote) => Ok(reconcile(remote.as_slice(), &local_map(installed))),
            Err(e) => {
                warn!("nvm ls-remote failed, showing installed versions only: {e}");
                Ok(installed)
            }
        }
    }

    async fn install(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        Self::check_candidate(candidate)?;
        self.client.install(version).await
    }

    async fn set_default(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        Self::check_candidate(candidate)?;
        self.client.set_default(version).await
    }

    async fn uninstall(&self, candidate: &str, version: &str) -> Result<(), BackendError> {
        Self::check_candidate(candidate)?;
        self.client.uninstall(version).await
    }

    async fn home_dir(&self, candidate: &str, version: &str) -> Result<PathBuf, BackendError> {
        Self::check_candidate(candidate)?;
        self.client.home(version).await
    }

    async fn tool_version(&self) -> Result<String, BackendError> {
        self.client.version().await
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn fake_nvm(dir: &Path, body: &str) -> NvmBackend {
        std::fs::write(dir.join("nvm.sh"), body).expect("write nvm.sh");
        NvmBackend::new(NvmClient::new(dir.to_path_buf()), Some("0.39.7".to_string()))
    }

    const FAKE_NVM: &str = r"nvm() {
  case $1 in
    ls) printf '%s\n' '->     v18.0.0' ;;
    ls-remote) printf '%s\n' '        v18.0.0   (LTS: Hydrogen)' '        v20.0.0' ;;
    *) return 1 ;;
  esac
}
";

    #[tokio::test]
    async fn remote_listing_carries_installed_flags() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let backend = fake_nvm(dir.path(), FAKE_NVM);

        let versions = backend
            .sorted_versions(NODE_CANDIDATE)
            .await
            .expect("listing succeeds");

        let ids: Vec<&str> = versions.iter().map(VersionRecord::identifier).collect();
        assert_eq!(ids, vec!["v20.0.0", "v18.0.0"]);
        assert!(!versions[0].installed());
        assert!(versions[1].installed());
        assert!(versions[1].active());
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_installed() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let backend = fake_nvm(
            dir.path(),
            "nvm() { [ \"$1\" = ls ] && printf '%s\\n' '       v16.20.2'; }\n",
        );

        let versions = backend
            .list_versions(NODE_CANDIDATE)
            .await
            .expect("installed listing succeeds");

        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].identifier(), "v16.20.2");
    }

    #[tokio::test]
    async fn only_node_candidate_is_supported() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let backend = fake_nvm(dir.path(), FAKE_NVM);

        assert_eq!(
            backend.candidates().await,
            Ok(vec![NODE_CANDIDATE.to_string()])
        );
        assert!(matches!(
            backend.install("java", "17.0.9-tem").await,
            Err(BackendError::Unsupported { .. })
        ));
    }

    #[test]
    fn backend_info_points_at_nvm_script() {
        let backend = NvmBackend::new(NvmClient::new(PathBuf::from("/home/dev/.nvm")), None);
        assert_eq!(backend.backend_info().path, PathBuf::from("/home/dev/.nvm/nvm.sh"));
        assert_eq!(
            backend.backend_info().data_dir,
            Some(PathBuf::from("/home/dev/.nvm"))
        );
    }
}
