//! Backend detection and bootstrap.
//!
//! Handles messages: `Initialized`

use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use iced::Task;

use sdkui_backend::{BackendProvider, VersionManager};
use sdkui_shell::{ProfileStatus, ensure_profile_snippets};

use crate::backend_kind::BackendKind;
use crate::error::AppError;
use crate::message::{BackendStatus, InitResult, Message};
use crate::notifications::{Severity, notify};
use crate::tray::ToolData;

use super::SdkUi;

#[derive(Debug, Clone)]
pub(super) struct InitOptions {
    pub install_missing: bool,
    pub update_profiles: bool,
    pub home_dir: Option<PathBuf>,
}

pub(super) async fn initialize(
    providers: Vec<(BackendKind, Arc<dyn BackendProvider>)>,
    options: InitOptions,
) -> InitResult {
    let mut backends = Vec::with_capacity(providers.len());
    for (kind, provider) in providers {
        backends.push(bootstrap_backend(kind, provider.as_ref(), &options).await);
    }
    InitResult { backends }
}

async fn bootstrap_backend(
    kind: BackendKind,
    provider: &dyn BackendProvider,
    options: &InitOptions,
) -> BackendStatus {
    let mut detection = provider.detect().await;
    let mut installed_now = false;
    let mut install_error = None;

    if !detection.found && options.install_missing {
        info!("{} not found, running its installer", provider.display_name());
        match provider.install_backend().await {
            Ok(()) => {
                detection = provider.detect().await;
                installed_now = detection.found;
                if !detection.found {
                    install_error = Some(AppError::backend_install_failed(
                        provider.display_name(),
                        "installer finished but the tool was not detected",
                    ));
                }
            }
            Err(e) => {
                install_error = Some(AppError::backend_install_failed(provider.display_name(), e));
            }
        }
    }

    let profiles = match &options.home_dir {
        Some(home) if detection.found && options.update_profiles => ensure_profile_snippets(
            home,
            &provider.shell_init_snippet(),
            provider.shell_config_marker(),
            provider.shell_config_label(),
        ),
        _ => Vec::new(),
    };

    debug!(
        "{kind}: found={}, version={:?}, installed_now={installed_now}",
        detection.found, detection.version
    );

    BackendStatus {
        kind,
        detection,
        installed_now,
        install_error,
        profiles,
    }
}

impl SdkUi {
    pub(super) fn init_options(&self) -> InitOptions {
        InitOptions {
            install_missing: self.settings.install_missing_backends,
            update_profiles: self.settings.update_shell_profiles,
            home_dir: self.home_dir.clone(),
        }
    }

    pub(super) fn handle_initialized(&mut self, result: InitResult) -> Task<Message> {
        info!(
            "Initialization finished for {} backend(s)",
            result.backends.len()
        );

        self.managers.clear();
        self.tools.clear();

        for status in result.backends {
            self.apply_backend_status(status);
        }

        self.start_population()
    }

    fn apply_backend_status(&mut self, status: BackendStatus) {
        let Some(provider) = self
            .providers
            .iter()
            .find(|(kind, _)| *kind == status.kind)
            .map(|(_, provider)| Arc::clone(provider))
        else {
            return;
        };
        let display_name = provider.display_name();
        let notifications = self.settings.notifications_enabled;

        if let Some(error) = &status.install_error {
            notify(
                notifications,
                Severity::Error,
                &format!("{display_name} unavailable"),
                &error.to_string(),
            );
        } else if status.installed_now {
            notify(
                notifications,
                Severity::Info,
                &format!("{display_name} installed"),
                "Open a new terminal to start using it.",
            );
        }

        let added: Vec<String> = status
            .profiles
            .iter()
            .filter_map(|outcome| match &outcome.status {
                ProfileStatus::Added => Some(outcome.file.to_string()),
                ProfileStatus::Failed(reason) => {
                    warn!("Could not update {}: {reason}", outcome.file);
                    None
                }
                ProfileStatus::AlreadyConfigured | ProfileStatus::Missing => None,
            })
            .collect();
        if !added.is_empty() {
            notify(
                notifications,
                Severity::Info,
                &format!("{display_name} added to your shell"),
                &format!("Updated {}", added.join(", ")),
            );
        }

        if !status.detection.found {
            warn!("{display_name} not found; leaving it out of the menu");
            return;
        }

        let manager: Arc<dyn VersionManager> = Arc::from(provider.create_manager(&status.detection));
        self.managers.push((status.kind, manager));
        self.tools.push(ToolData {
            backend: status.kind,
            display_name,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use sdkui_backend::BackendDetection;
    use sdkui_shell::{ProfileFile, ProfileOutcome};

    use super::*;
    use crate::app::test_support::test_app;

    fn status(kind: BackendKind, found: bool) -> BackendStatus {
        BackendStatus {
            kind,
            detection: BackendDetection {
                found,
                path: None,
                version: Some("1.0.0".to_string()),
                data_dir: Some(PathBuf::from("/tmp/tool")),
            },
            installed_now: false,
            install_error: None,
            profiles: Vec::new(),
        }
    }

    #[test]
    fn detected_backends_get_managers_and_tool_items() {
        let mut app = test_app();

        let _ = app.handle_initialized(InitResult {
            backends: vec![
                status(BackendKind::Sdkman, true),
                status(BackendKind::Nvm, true),
            ],
        });

        let kinds: Vec<BackendKind> = app.managers.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![BackendKind::Sdkman, BackendKind::Nvm]);
        assert_eq!(app.tools[0].display_name, "SDKMAN");
        assert!(app.populating);
    }

    #[test]
    fn missing_backend_is_left_out_of_the_menu() {
        let mut app = test_app();
        let mut nvm = status(BackendKind::Nvm, false);
        nvm.install_error = Some(AppError::backend_install_failed("nvm", "offline"));
        nvm.profiles = vec![ProfileOutcome {
            file: ProfileFile::Bashrc,
            status: ProfileStatus::Missing,
        }];

        let _ = app.handle_initialized(InitResult {
            backends: vec![status(BackendKind::Sdkman, true), nvm],
        });

        assert_eq!(app.managers.len(), 1);
        assert!(app.manager(BackendKind::Nvm).is_none());
        assert_eq!(app.tools.len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_appends_profile_snippet_for_found_backend() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let nvm_dir = dir.path().join(".nvm");
        std::fs::create_dir_all(&nvm_dir).expect("create nvm dir");
        std::fs::write(nvm_dir.join("nvm.sh"), "").expect("write nvm.sh");
        std::fs::write(dir.path().join(".bashrc"), "alias ll='ls -l'\n").expect("write bashrc");

        let provider = sdkui_nvm::NvmProvider::new().with_nvm_dir(Some(nvm_dir));
        let options = InitOptions {
            install_missing: false,
            update_profiles: true,
            home_dir: Some(dir.path().to_path_buf()),
        };

        let status = bootstrap_backend(BackendKind::Nvm, &provider, &options).await;

        assert!(status.detection.found);
        assert!(!status.installed_now);
        assert!(status.profiles.iter().any(|outcome| {
            outcome.file == ProfileFile::Bashrc && outcome.status == ProfileStatus::Added
        }));
        let bashrc =
            std::fs::read_to_string(dir.path().join(".bashrc")).expect("read bashrc");
        assert!(bashrc.contains("export NVM_DIR="));
    }

    #[tokio::test]
    async fn missing_backend_without_install_is_reported_not_found() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let provider =
            sdkui_nvm::NvmProvider::new().with_nvm_dir(Some(dir.path().join("absent")));
        let options = InitOptions {
            install_missing: false,
            update_profiles: true,
            home_dir: Some(dir.path().to_path_buf()),
        };

        let status = bootstrap_backend(BackendKind::Nvm, &provider, &options).await;

        assert!(!status.detection.found);
        assert!(status.install_error.is_none());
        assert!(status.profiles.is_empty());
    }
}
