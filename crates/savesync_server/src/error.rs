//! Error types for the save server.

use savesync_protocol::ProtocolError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the save server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Request body could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ProtocolError),

    /// Save carried a sequence number that is not newer than the stored one.
    #[error("stale sn: stored {stored}, received {received}")]
    StaleSequence {
        /// Sequence number on record.
        stored: u64,
        /// Sequence number in the request.
        received: u64,
    },

    /// Save payload exceeds the configured limit.
    #[error("save data too large: {size} > {limit}")]
    PayloadTooLarge {
        /// Token size in bytes.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// No handler for the requested path.
    #[error("no endpoint at {0}")]
    UnknownPath(String),
}

impl ServerError {
    /// HTTP status used when this error ends a request.
    ///
    /// Save refusals are answered with 200 and the reason as body, which is
    /// what clients expect; only transport-level problems map to 4xx.
    pub fn status(&self) -> u16 {
        match self {
            ServerError::UnknownPath(_) => 404,
            ServerError::InvalidRequest(_) => 400,
            ServerError::StaleSequence { .. } | ServerError::PayloadTooLarge { .. } => 200,
        }
    }
}
