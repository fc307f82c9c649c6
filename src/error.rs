/// Error types for the background coordinator
use thiserror::Error;

/// A failed call into the browser's window/tab API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }
}

/// The five ways an action request can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    UnauthorizedSender,
    UnknownAction,
    InvalidArgument,
    HostApi,
}

/// Errors surfaced by the action router, one per failed request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Invalid message format")]
    InvalidRequest,

    #[error("Unauthorized sender")]
    UnauthorizedSender,

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid {0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    HostApi(#[from] HostError),
}

impl RouterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::InvalidRequest => ErrorKind::InvalidRequest,
            RouterError::UnauthorizedSender => ErrorKind::UnauthorizedSender,
            RouterError::UnknownAction(_) => ErrorKind::UnknownAction,
            RouterError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            RouterError::HostApi(_) => ErrorKind::HostApi,
        }
    }
}
