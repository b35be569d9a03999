use std::path::PathBuf;

use sdkui_backend::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
    Backend(BackendError),
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Io { kind, message } => write!(f, "{kind}: {message}"),
            Self::Backend(error) => write!(f, "{error}"),
        }
    }
}

impl From<String> for AppErrorDetail {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppErrorDetail {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<std::io::Error> for AppErrorDetail {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<BackendError> for AppErrorDetail {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Message(String),
    BackendInstallFailed {
        backend: &'static str,
        details: AppErrorDetail,
    },
    OperationFailed {
        operation: &'static str,
        details: AppErrorDetail,
    },
    OpenFailed {
        path: PathBuf,
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn backend_install_failed(
        backend: &'static str,
        details: impl Into<AppErrorDetail>,
    ) -> Self {
        Self::BackendInstallFailed {
            backend,
            details: details.into(),
        }
    }

    pub fn operation_failed(operation: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::OperationFailed {
            operation,
            details: details.into(),
        }
    }

    pub fn open_failed(path: PathBuf, details: impl Into<AppErrorDetail>) -> Self {
        Self::OpenFailed {
            path,
            details: details.into(),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppError {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::BackendInstallFailed { backend, details } => {
                write!(f, "Failed to install {backend}: {details}")
            }
            Self::OperationFailed { operation, details } => {
                write!(f, "{operation} failed: {details}")
            }
            Self::OpenFailed { path, details } => {
                write!(f, "Could not open {}: {details}", path.display())
            }
        }
    }
}

impl std::error::Error for AppError {}
