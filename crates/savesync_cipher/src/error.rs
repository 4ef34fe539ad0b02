//! Error types for the cipher crate.

use thiserror::Error;

/// Result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Errors raised while preparing key material.
///
/// The block and mode functions themselves cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Secret material is shorter than one block.
    #[error("{what} too short: expected at least {expected} bytes, got {actual}")]
    MaterialTooShort {
        /// Which secret was rejected ("key" or "iv").
        what: &'static str,
        /// Minimum accepted length.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
}

impl CipherError {
    /// Create a material-too-short error.
    pub fn material_too_short(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::MaterialTooShort {
            what,
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CipherError::material_too_short("key", 16, 5);
        let msg = err.to_string();
        assert!(msg.starts_with("key too short"));
        assert!(msg.contains("16"));
        assert!(msg.contains('5'));
    }
}
