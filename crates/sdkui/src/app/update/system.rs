use iced::Task;

use crate::message::Message;

use super::super::SdkUi;

impl SdkUi {
    pub(super) fn dispatch_system(&mut self, message: Message) -> super::DispatchResult {
        match message {
            Message::Tick => Ok(Self::handle_tick()),
            Message::TrayEvent(tray_msg) => Ok(self.handle_tray_event(tray_msg)),
            Message::Initialized(result) => Ok(self.handle_initialized(*result)),
            Message::Quit => Ok(Self::handle_quit()),
            Message::NoOp => Ok(Task::none()),
            other => Err(Box::new(other)),
        }
    }

    fn handle_tick() -> Task<Message> {
        #[cfg(target_os = "linux")]
        {
            if crate::tray::is_tray_active() {
                while gtk::events_pending() {
                    gtk::main_iteration();
                }
            }
        }
        Task::none()
    }
}
