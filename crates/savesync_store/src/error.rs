//! Error types for the save store.

use thiserror::Error;

/// Result type for whole-document operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from loading or serializing the save document.
///
/// Typed accessors never fail; only whole-document operations do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Text is not valid JSON.
    #[error("document parse failed: {0}")]
    Parse(String),

    /// Text is valid JSON but not an object.
    #[error("document is not a JSON object (found {found})")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// No document has been loaded yet.
    #[error("no document loaded")]
    NotLoaded,

    /// Rendering the document failed.
    #[error("document serialization failed: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(StoreError::NotLoaded.to_string(), "no document loaded");
        let err = StoreError::NotAnObject { found: "array" };
        assert!(err.to_string().contains("array"));
    }
}
