mod operations;
mod system;

use iced::Task;

use crate::message::Message;

use super::SdkUi;

type DispatchResult = Result<Task<Message>, Box<Message>>;

impl SdkUi {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let message = match self.dispatch_operations(message) {
            Ok(task) => return task,
            Err(message) => *message,
        };
        let message = match self.dispatch_system(message) {
            Ok(task) => return task,
            Err(message) => *message,
        };

        log::debug!("Unhandled message: {message:?}");
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{java_key, test_app};
    use super::*;
    use crate::registry::{EntryAction, FamilyListing};
    use crate::tray::TrayMessage;

    #[test]
    fn tray_entry_event_dispatches_to_operations() {
        let mut app = test_app();
        let key = java_key("11.0.21-tem");

        let _ = app.update(Message::TrayEvent(TrayMessage::Entry {
            key: key.clone(),
            action: EntryAction::Uninstall,
        }));

        assert!(app.registry.is_pending(&key));
    }

    #[test]
    fn populated_menu_replaces_registry() {
        let mut app = test_app();
        let _ = app.update(Message::Refresh);
        assert!(app.populating);

        let _ = app.update(Message::MenuPopulated(vec![FamilyListing {
            backend: crate::backend_kind::BackendKind::Sdkman,
            candidate: "kotlin".to_string(),
            versions: Vec::new(),
        }]));

        assert!(!app.populating);
        assert_eq!(app.registry.families().len(), 1);
        assert!(app.registry.record(&java_key("17.0.9-tem")).is_none());
    }

    #[test]
    fn operation_completion_dispatches() {
        let mut app = test_app();
        let key = java_key("21.0.1-tem");
        let _ = app.update(Message::TrayEvent(TrayMessage::Entry {
            key: key.clone(),
            action: EntryAction::InstallAndUse,
        }));

        let _ = app.update(Message::OperationComplete {
            key: key.clone(),
            action: EntryAction::InstallAndUse,
            result: Ok(()),
        });

        assert!(!app.registry.is_pending(&key));
        assert!(app.registry.record(&key).is_some_and(|r| r.active()));
    }
}
