use iced::Task;

use crate::message::Message;

use super::super::SdkUi;

impl SdkUi {
    pub(super) fn dispatch_operations(&mut self, message: Message) -> super::DispatchResult {
        match message {
            Message::Refresh => Ok(self.start_population()),
            Message::MenuPopulated(families) => Ok(self.handle_menu_populated(families)),
            Message::OperationComplete {
                key,
                action,
                result,
            } => Ok(self.handle_operation_complete(key, action, result)),
            Message::HomeResolved { key, result } => Ok(self.handle_home_resolved(&key, result)),
            Message::ToolVersionFetched { backend, result } => {
                Ok(self.handle_tool_version_fetched(backend, &result))
            }
            Message::SdkmanUpdated(result) => Ok(self.handle_sdkman_updated(result)),
            other => Err(Box::new(other)),
        }
    }
}
