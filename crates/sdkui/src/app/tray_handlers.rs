//! System tray event handling.
//!
//! Handles messages: `TrayEvent`, `Quit`

use log::{debug, info};

use iced::Task;

use crate::message::Message;
use crate::tray::{self, TrayMessage};

use super::SdkUi;

impl SdkUi {
    pub(super) fn handle_tray_event(&mut self, msg: TrayMessage) -> Task<Message> {
        debug!("Tray event: {msg:?}");
        match msg {
            TrayMessage::Entry { key, action } => self.handle_entry_action(key, action),
            TrayMessage::ToolVersion(backend) => self.handle_tool_version(backend),
            TrayMessage::UpdateSdkman => self.handle_update_sdkman(),
            TrayMessage::Refresh => self.start_population(),
            TrayMessage::Quit => Self::handle_quit(),
        }
    }

    pub(super) fn handle_quit() -> Task<Message> {
        info!("Quitting");
        tray::destroy_tray();
        iced::exit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{java_key, test_app};
    use crate::registry::EntryAction;

    #[test]
    fn entry_events_reach_the_action_handlers() {
        let mut app = test_app();
        let key = java_key("21.0.1-tem");

        let _ = app.handle_tray_event(TrayMessage::Entry {
            key: key.clone(),
            action: EntryAction::InstallAndUse,
        });

        assert!(app.registry.is_pending(&key));
    }

    #[test]
    fn refresh_starts_population() {
        let mut app = test_app();

        let _ = app.handle_tray_event(TrayMessage::Refresh);

        assert!(app.populating);
    }
}
