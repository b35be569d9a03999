//! Per-entry actions and the global tool actions.
//!
//! Handles messages: `OperationComplete`, `HomeResolved`,
//! `ToolVersionFetched`, `SdkmanUpdated`

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use iced::Task;

use sdkui_backend::{VersionManager, VersionRecord};

use crate::backend_kind::BackendKind;
use crate::error::AppError;
use crate::message::Message;
use crate::notifications::{Severity, notify, summarize};
use crate::registry::{EntryAction, EntryKey};

use super::SdkUi;

impl SdkUi {
    pub(super) fn handle_entry_action(&mut self, key: EntryKey, action: EntryAction) -> Task<Message> {
        let Some(record) = self.registry.record(&key).cloned() else {
            debug!(
                "Ignoring {} for {key}: entry is no longer in the menu",
                action.as_str()
            );
            return Task::none();
        };
        if self.registry.is_pending(&key) {
            debug!("Ignoring {} for {key}: operation in flight", action.as_str());
            return Task::none();
        }
        let Some(manager) = self.manager(key.backend) else {
            warn!("No {} manager for {key}", key.backend);
            return Task::none();
        };

        match action {
            EntryAction::InstallAndUse => self.start_install(key, &record, manager),
            EntryAction::Uninstall => self.start_uninstall(key, &record, manager),
            EntryAction::OpenHome => Self::start_open_home(key, &record, manager),
        }
    }

    fn start_install(
        &mut self,
        key: EntryKey,
        record: &VersionRecord,
        manager: Arc<dyn VersionManager>,
    ) -> Task<Message> {
        if record.active() {
            debug!("{key} is already in use");
            return Task::none();
        }
        if !self.registry.begin(&key) {
            return Task::none();
        }

        let switch_only = record.installed();
        let summary = if switch_only { "Switching to" } else { "Installing" };
        notify(
            self.settings.notifications_enabled,
            Severity::Info,
            summary,
            &key.to_string(),
        );
        self.refresh_menu();

        let task_key = key.clone();
        Task::perform(
            async move {
                let result = if switch_only {
                    manager
                        .set_default(&task_key.candidate, &task_key.version)
                        .await
                } else {
                    manager.install(&task_key.candidate, &task_key.version).await
                };
                result.map_err(|e| AppError::operation_failed("Install & Use", e))
            },
            move |result| Message::OperationComplete {
                key,
                action: EntryAction::InstallAndUse,
                result,
            },
        )
    }

    fn start_uninstall(
        &mut self,
        key: EntryKey,
        record: &VersionRecord,
        manager: Arc<dyn VersionManager>,
    ) -> Task<Message> {
        if !record.installed() {
            debug!("{key} is not installed");
            return Task::none();
        }
        if record.active() {
            notify(
                self.settings.notifications_enabled,
                Severity::Error,
                &format!("Cannot uninstall {key}"),
                "It is the version in use. Switch to another version first.",
            );
            return Task::none();
        }
        if !self.registry.begin(&key) {
            return Task::none();
        }

        notify(
            self.settings.notifications_enabled,
            Severity::Info,
            "Uninstalling",
            &key.to_string(),
        );
        self.refresh_menu();

        let task_key = key.clone();
        Task::perform(
            async move {
                manager
                    .uninstall(&task_key.candidate, &task_key.version)
                    .await
                    .map_err(|e| AppError::operation_failed("Uninstall", e))
            },
            move |result| Message::OperationComplete {
                key,
                action: EntryAction::Uninstall,
                result,
            },
        )
    }

    fn start_open_home(
        key: EntryKey,
        record: &VersionRecord,
        manager: Arc<dyn VersionManager>,
    ) -> Task<Message> {
        if !record.installed() {
            debug!("{key} has no home directory: not installed");
            return Task::none();
        }

        let task_key = key.clone();
        Task::perform(
            async move {
                manager
                    .home_dir(&task_key.candidate, &task_key.version)
                    .await
                    .map_err(|e| AppError::operation_failed("Open Home", e))
            },
            move |result| Message::HomeResolved { key, result },
        )
    }

    pub(super) fn handle_operation_complete(
        &mut self,
        key: EntryKey,
        action: EntryAction,
        result: Result<(), AppError>,
    ) -> Task<Message> {
        self.registry.finish(&key);
        let notifications = self.settings.notifications_enabled;

        match result {
            Ok(()) => {
                let (updated, summary) = match action {
                    EntryAction::InstallAndUse => {
                        (self.registry.mark_installed_active(&key), "Now using")
                    }
                    EntryAction::Uninstall => (self.registry.mark_uninstalled(&key), "Uninstalled"),
                    EntryAction::OpenHome => (true, "Opened"),
                };
                if !updated {
                    debug!("{key} left the menu before its operation finished");
                }
                notify(notifications, Severity::Info, summary, &key.to_string());
            }
            Err(error) => {
                notify(
                    notifications,
                    Severity::Error,
                    &format!("{key} could not be updated"),
                    &error.to_string(),
                );
            }
        }

        self.refresh_menu();
        Task::none()
    }

    pub(super) fn handle_home_resolved(
        &self,
        key: &EntryKey,
        result: Result<PathBuf, AppError>,
    ) -> Task<Message> {
        match result {
            Ok(path) => {
                debug!("Opening home of {key}: {}", path.display());
                open_path_task(path, self.settings.notifications_enabled)
            }
            Err(error) => {
                notify(
                    self.settings.notifications_enabled,
                    Severity::Error,
                    &format!("No home directory for {key}"),
                    &error.to_string(),
                );
                Task::none()
            }
        }
    }

    pub(super) fn handle_tool_version(&self, backend: BackendKind) -> Task<Message> {
        let Some(manager) = self.manager(backend) else {
            return Task::none();
        };
        Task::perform(
            async move {
                manager
                    .tool_version()
                    .await
                    .map_err(|e| AppError::operation_failed("Version query", e))
            },
            move |result| Message::ToolVersionFetched { backend, result },
        )
    }

    pub(super) fn handle_tool_version_fetched(
        &self,
        backend: BackendKind,
        result: &Result<String, AppError>,
    ) -> Task<Message> {
        let display_name = self.display_name(backend);
        match result {
            Ok(version) => notify(
                self.settings.notifications_enabled,
                Severity::Info,
                &format!("{display_name} version"),
                version,
            ),
            Err(error) => notify(
                self.settings.notifications_enabled,
                Severity::Error,
                &format!("{display_name} version"),
                &error.to_string(),
            ),
        }
        Task::none()
    }

    pub(super) fn handle_update_sdkman(&self) -> Task<Message> {
        let Some(manager) = self.manager(BackendKind::Sdkman) else {
            return Task::none();
        };
        notify(
            self.settings.notifications_enabled,
            Severity::Info,
            "Updating SDKMAN",
            "Refreshing the candidate list",
        );
        Task::perform(
            async move {
                manager
                    .self_update()
                    .await
                    .map_err(|e| AppError::operation_failed("SDKMAN update", e))
            },
            Message::SdkmanUpdated,
        )
    }

    pub(super) fn handle_sdkman_updated(&mut self, result: Result<String, AppError>) -> Task<Message> {
        match result {
            Ok(output) => {
                notify(
                    self.settings.notifications_enabled,
                    Severity::Info,
                    "SDKMAN updated",
                    summarize(&output),
                );
                // New candidates only show up after a relist.
                self.start_population()
            }
            Err(error) => {
                notify(
                    self.settings.notifications_enabled,
                    Severity::Error,
                    "SDKMAN update",
                    &error.to_string(),
                );
                Task::none()
            }
        }
    }
}

fn open_path_task(path: PathBuf, notifications: bool) -> Task<Message> {
    Task::perform(
        async move {
            if let Err(e) = open::that(&path) {
                let error = AppError::open_failed(path, e);
                notify(
                    notifications,
                    Severity::Error,
                    "Open Home",
                    &error.to_string(),
                );
            }
        },
        |()| Message::NoOp,
    )
}
