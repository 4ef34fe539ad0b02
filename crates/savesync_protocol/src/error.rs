//! Error types for the wire protocol.

use savesync_codec::CodecError;
use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// A message did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Response body was empty.
    #[error("empty response body")]
    EmptyBody,

    /// Body is not UTF-8 text.
    #[error("body is not valid UTF-8")]
    InvalidUtf8,

    /// Load response is neither `NULL` nor a valid envelope.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A required form field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A form field has an unusable value.
    #[error("invalid field {field}: {message}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Form body could not be split.
    #[error(transparent)]
    Form(#[from] CodecError),
}

impl ProtocolError {
    /// Create an invalid field error.
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}
