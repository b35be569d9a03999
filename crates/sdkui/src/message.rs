use std::path::PathBuf;

use sdkui_backend::BackendDetection;
use sdkui_shell::ProfileOutcome;

use crate::backend_kind::BackendKind;
use crate::error::AppError;
use crate::registry::{EntryAction, EntryKey, FamilyListing};
use crate::tray::TrayMessage;

#[derive(Debug, Clone)]
pub enum Message {
    NoOp,
    Tick,
    TrayEvent(TrayMessage),
    Initialized(Box<InitResult>),

    Refresh,
    MenuPopulated(Vec<FamilyListing>),

    OperationComplete {
        key: EntryKey,
        action: EntryAction,
        result: Result<(), AppError>,
    },
    HomeResolved {
        key: EntryKey,
        result: Result<PathBuf, AppError>,
    },
    ToolVersionFetched {
        backend: BackendKind,
        result: Result<String, AppError>,
    },
    SdkmanUpdated(Result<String, AppError>),

    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct InitResult {
    pub backends: Vec<BackendStatus>,
}

/// Outcome of detecting, and if needed bootstrapping, one backend.
#[derive(Debug, Clone)]
pub struct BackendStatus {
    pub kind: BackendKind,
    pub detection: BackendDetection,
    pub installed_now: bool,
    pub install_error: Option<AppError>,
    pub profiles: Vec<ProfileOutcome>,
}
