//! Error types for the codec crate.

use savesync_cipher::CipherError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Key or IV material was rejected.
    #[error("invalid key material: {0}")]
    KeyMaterial(#[from] CipherError),

    /// Token is not valid base64.
    #[error("invalid base64: {message}")]
    InvalidBase64 {
        /// Description of the decoding error.
        message: String,
    },

    /// Decrypted payload is not UTF-8 text.
    #[error("invalid UTF-8 in decrypted payload")]
    InvalidUtf8,

    /// Form body could not be split into `name=value` pairs.
    #[error("malformed form body: {message}")]
    MalformedForm {
        /// Description of the structural error.
        message: String,
    },
}

impl CodecError {
    /// Create an invalid base64 error.
    pub fn invalid_base64(message: impl Into<String>) -> Self {
        Self::InvalidBase64 {
            message: message.into(),
        }
    }

    /// Create a malformed form error.
    pub fn malformed_form(message: impl Into<String>) -> Self {
        Self::MalformedForm {
            message: message.into(),
        }
    }
}
