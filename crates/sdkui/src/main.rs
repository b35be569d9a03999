mod app;
mod backend_kind;
mod error;
mod logging;
mod message;
mod notifications;
mod registry;
mod settings;
mod single_instance;
mod tray;

use sdkui_platform::AppPaths;

use crate::app::SdkUi;
use crate::settings::AppSettings;
use crate::single_instance::{AcquireError, SingleInstance};

fn main() -> iced::Result {
    let paths = match AppPaths::new() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("sdkui: {e}");
            std::process::exit(1);
        }
    };

    let settings_path = paths.settings_file();
    let settings = AppSettings::load_from(&settings_path);
    logging::init_logging(&paths, settings.debug_logging, settings.max_log_size_bytes);

    if !settings_path.exists()
        && let Err(e) = settings.save_to(&settings_path)
    {
        log::warn!("Could not write default settings: {e}");
    }

    let _instance = match SingleInstance::acquire(&paths.lock_file()) {
        Ok(instance) => Some(instance),
        Err(AcquireError::AlreadyRunning) => {
            log::info!("Another sdkui instance is running; exiting");
            return Ok(());
        }
        Err(e) => {
            log::warn!("Single-instance lock unavailable: {e}");
            None
        }
    };

    #[cfg(target_os = "linux")]
    if let Err(e) = gtk::init() {
        log::error!("Failed to initialize GTK: {e}");
        return Ok(());
    }

    log::info!("Starting sdkui {}", env!("CARGO_PKG_VERSION"));

    iced::daemon(SdkUi::new, SdkUi::update, SdkUi::view)
        .subscription(SdkUi::subscription)
        .run()
}
