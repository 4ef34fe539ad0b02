//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Rejected configuration or double initialization.
    #[error("configuration error: {0}")]
    Config(String),

    /// The session has not been initialized.
    #[error("session not initialized")]
    NotInitialized,

    /// Another request is still in flight.
    #[error("a request is already in flight")]
    Busy,

    /// Network failure, timeout or non-success HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// HTTP status, when the server answered.
        status: Option<u16>,
    },

    /// Response body did not have the expected shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The save document could not be parsed or serialized.
    #[error("document error: {0}")]
    Document(String),

    /// The server refused a save; carries the response text.
    #[error("server rejected save: {0}")]
    ServerRejected(String),

    /// The session was released before the request completed.
    #[error("request cancelled")]
    Cancelled,
}

/// Coarse classification of a [`SyncError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad init arguments.
    Config,
    /// Session not initialized.
    NotInitialized,
    /// Request already in flight.
    Busy,
    /// Network or HTTP failure.
    Transport,
    /// Malformed response.
    Protocol,
    /// Document parse or serialize failure.
    Document,
    /// Save refused by the server.
    ServerRejected,
    /// Session released mid-request.
    Cancelled,
}

impl SyncError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a connection-level transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a transport error for a non-success HTTP status.
    pub fn http_status(status: u16) -> Self {
        Self::Transport {
            message: format!("unexpected HTTP status {status}"),
            status: Some(status),
        }
    }

    /// Returns the error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Config(_) => ErrorKind::Config,
            SyncError::NotInitialized => ErrorKind::NotInitialized,
            SyncError::Busy => ErrorKind::Busy,
            SyncError::Transport { .. } => ErrorKind::Transport,
            SyncError::Protocol(_) => ErrorKind::Protocol,
            SyncError::Document(_) => ErrorKind::Document,
            SyncError::ServerRejected(_) => ErrorKind::ServerRejected,
            SyncError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Returns true if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Transport { .. })
    }
}
