mod init;
mod operations;
mod populate;
mod tray_handlers;
mod update;

use std::path::PathBuf;
use std::sync::Arc;

use iced::{Element, Subscription, Task};

use sdkui_backend::{BackendProvider, VersionManager};
use sdkui_core::CATALOG_BASE_URL;
use sdkui_nvm::NvmProvider;
use sdkui_platform::AppPaths;
use sdkui_sdkman::{CatalogSource, SdkmanProvider};

use crate::backend_kind::BackendKind;
use crate::message::Message;
use crate::registry::MenuRegistry;
use crate::settings::{AppSettings, VersionSource};
use crate::tray::{self, ToolData, TrayMenuData};

pub struct SdkUi {
    pub(crate) settings: AppSettings,
    pub(crate) home_dir: Option<PathBuf>,
    pub(crate) providers: Vec<(BackendKind, Arc<dyn BackendProvider>)>,
    pub(crate) managers: Vec<(BackendKind, Arc<dyn VersionManager>)>,
    pub(crate) tools: Vec<ToolData>,
    pub(crate) registry: MenuRegistry,
    pub(crate) populating: bool,
}

impl SdkUi {
    pub fn new() -> (Self, Task<Message>) {
        let paths = AppPaths::new().ok();
        let settings = paths
            .as_ref()
            .map(|paths| AppSettings::load_from(&paths.settings_file()))
            .unwrap_or_default();
        let app = Self::with_settings(settings, paths.map(|paths| paths.home_dir));

        if let Err(e) = tray::init_tray() {
            log::error!("Failed to create tray icon: {e}");
            return (app, iced::exit());
        }

        let init_task = Task::perform(
            init::initialize(app.providers.clone(), app.init_options()),
            |result| Message::Initialized(Box::new(result)),
        );

        (app, init_task)
    }

    fn with_settings(settings: AppSettings, home_dir: Option<PathBuf>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.http_timeout_secs))
            .user_agent(format!("sdkui/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        let providers = build_providers(&settings, &http_client);

        Self {
            settings,
            home_dir,
            providers,
            managers: Vec::new(),
            tools: Vec::new(),
            registry: MenuRegistry::default(),
            populating: false,
        }
    }

    // The daemon never opens a window; everything lives in the tray menu.
    #[allow(clippy::unused_self)]
    pub fn view(&self, _window: iced::window::Id) -> Element<'_, Message> {
        iced::widget::text("").into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let tick_ms = {
            #[cfg(target_os = "linux")]
            {
                if tray::is_tray_active() { 100 } else { 1000 }
            }
            #[cfg(not(target_os = "linux"))]
            {
                1000u64
            }
        };
        let tick =
            iced::time::every(std::time::Duration::from_millis(tick_ms)).map(|_| Message::Tick);

        let tray_sub = if tray::is_tray_active() {
            tray::tray_subscription()
        } else {
            Subscription::none()
        };

        Subscription::batch([tick, tray_sub])
    }

    pub(crate) fn manager(&self, backend: BackendKind) -> Option<Arc<dyn VersionManager>> {
        self.managers
            .iter()
            .find(|(kind, _)| *kind == backend)
            .map(|(_, manager)| Arc::clone(manager))
    }

    pub(crate) fn display_name(&self, backend: BackendKind) -> &'static str {
        self.providers
            .iter()
            .find(|(kind, _)| *kind == backend)
            .map_or(backend.as_str(), |(_, provider)| provider.display_name())
    }

    pub(crate) fn refresh_menu(&self) {
        tray::update_menu(&TrayMenuData::from_registry(&self.registry, &self.tools));
    }
}

fn build_providers(
    settings: &AppSettings,
    http_client: &reqwest::Client,
) -> Vec<(BackendKind, Arc<dyn BackendProvider>)> {
    BackendKind::ALL
        .into_iter()
        .filter(|kind| settings.is_enabled(*kind))
        .map(|kind| {
            let provider: Arc<dyn BackendProvider> = match kind {
                BackendKind::Sdkman => {
                    let catalog = (settings.sdkman_version_source == VersionSource::Catalog)
                        .then(|| CatalogSource {
                            http: http_client.clone(),
                            base_url: CATALOG_BASE_URL.to_string(),
                        });
                    Arc::new(
                        SdkmanProvider::new()
                            .with_sdkman_dir(settings.sdkman_dir.clone())
                            .with_candidates(settings.candidates.clone())
                            .with_catalog(catalog),
                    )
                }
                BackendKind::Nvm => {
                    Arc::new(NvmProvider::new().with_nvm_dir(settings.nvm_dir.clone()))
                }
            };
            (kind, provider)
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_follow_enabled_backends_in_menu_order() {
        let settings = AppSettings {
            enabled_backends: vec![BackendKind::Nvm, BackendKind::Sdkman],
            ..AppSettings::default()
        };
        let app = SdkUi::with_settings(settings, None);

        let kinds: Vec<BackendKind> = app.providers.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![BackendKind::Sdkman, BackendKind::Nvm]);
        assert_eq!(app.display_name(BackendKind::Sdkman), "SDKMAN");
    }

    #[test]
    fn disabled_backends_get_no_provider() {
        let settings = AppSettings {
            enabled_backends: vec![BackendKind::Nvm],
            ..AppSettings::default()
        };
        let app = SdkUi::with_settings(settings, None);

        assert_eq!(app.providers.len(), 1);
        assert_eq!(app.providers[0].1.name(), "nvm");
        assert_eq!(app.display_name(BackendKind::Sdkman), "sdkman");
    }

    #[test]
    fn manager_lookup_by_backend() {
        let app = test_support::test_app();

        assert!(app.manager(BackendKind::Sdkman).is_some());
        assert!(app.manager(BackendKind::Nvm).is_none());
    }
}
