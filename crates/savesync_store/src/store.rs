//! The save document.

use crate::error::{StoreError, StoreResult};
use crate::value::{SaveValue, Touch};
use serde_json::{Map, Value};

/// A flat JSON object holding typed save values.
///
/// The store starts unloaded. Until a document is loaded every accessor
/// returns its default and reports [`Touch::Unchanged`], so callers can use
/// accessors unconditionally.
///
/// # Example
///
/// ```rust
/// use savesync_store::{SaveStore, Touch};
///
/// let mut store = SaveStore::new();
/// store.load_from("").unwrap();
///
/// assert_eq!(store.get_int("level", 1), (1, Touch::DefaultPersisted));
/// assert_eq!(store.get_int("level", 9), (1, Touch::Unchanged));
/// assert_eq!(store.serialize().unwrap(), r#"{"level":1}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SaveStore {
    document: Option<Map<String, Value>>,
}

impl SaveStore {
    /// Creates an unloaded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a document has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// Replaces the whole document with `text`.
    ///
    /// Empty text loads an empty object. Any other text must be a JSON
    /// object. On error the current document is kept.
    pub fn load_from(&mut self, text: &str) -> StoreResult<()> {
        if text.is_empty() {
            self.document = Some(Map::new());
            return Ok(());
        }

        let value: Value =
            serde_json::from_str(text).map_err(|e| StoreError::Parse(e.to_string()))?;
        match value {
            Value::Object(map) => {
                self.document = Some(map);
                Ok(())
            }
            other => Err(StoreError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Renders the document as compact JSON.
    pub fn serialize(&self) -> StoreResult<String> {
        let document = self.document.as_ref().ok_or(StoreError::NotLoaded)?;
        serde_json::to_string(document).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    /// Returns to the unloaded state.
    pub fn reset(&mut self) {
        self.document = None;
    }

    /// Loads an empty document.
    pub fn clear(&mut self) {
        self.document = Some(Map::new());
    }

    /// Reads `key`, storing `default` if the key is absent or holds another
    /// type.
    pub fn get<T: SaveValue>(&mut self, key: &str, default: T) -> (T, Touch) {
        let Some(document) = self.document.as_mut() else {
            return (default, Touch::Unchanged);
        };
        if key.is_empty() {
            return (default, Touch::Unchanged);
        }

        if let Some(stored) = document.get(key).and_then(T::from_json) {
            return (stored, Touch::Unchanged);
        }

        match default.to_json() {
            Some(json) => {
                document.insert(key.to_string(), json);
                (default, Touch::DefaultPersisted)
            }
            None => {
                tracing::warn!(key, "default has no JSON form, not persisted");
                (default, Touch::Unchanged)
            }
        }
    }

    /// Writes `value` under `key` unless the same value is already stored.
    pub fn set<T: SaveValue>(&mut self, key: &str, value: T) -> Touch {
        let Some(document) = self.document.as_mut() else {
            return Touch::Unchanged;
        };
        if key.is_empty() {
            return Touch::Unchanged;
        }

        if document.get(key).is_some_and(|stored| value.same_as(stored)) {
            return Touch::Unchanged;
        }

        match value.to_json() {
            Some(json) => {
                document.insert(key.to_string(), json);
                Touch::ValueChanged
            }
            None => {
                tracing::warn!(key, "value has no JSON form, ignored");
                Touch::Unchanged
            }
        }
    }

    /// Reads a bool.
    pub fn get_bool(&mut self, key: &str, default: bool) -> (bool, Touch) {
        self.get(key, default)
    }

    /// Reads a 32-bit integer.
    pub fn get_int(&mut self, key: &str, default: i32) -> (i32, Touch) {
        self.get(key, default)
    }

    /// Reads a single-precision float.
    pub fn get_float(&mut self, key: &str, default: f32) -> (f32, Touch) {
        self.get(key, default)
    }

    /// Reads a double.
    pub fn get_double(&mut self, key: &str, default: f64) -> (f64, Touch) {
        self.get(key, default)
    }

    /// Reads a string.
    pub fn get_string(&mut self, key: &str, default: &str) -> (String, Touch) {
        self.get(key, default.to_string())
    }

    /// Reads a byte blob stored as base64 text.
    pub fn get_bytes(&mut self, key: &str, default: &[u8]) -> (Vec<u8>, Touch) {
        self.get(key, default.to_vec())
    }

    /// Writes a bool.
    pub fn set_bool(&mut self, key: &str, value: bool) -> Touch {
        self.set(key, value)
    }

    /// Writes a 32-bit integer.
    pub fn set_int(&mut self, key: &str, value: i32) -> Touch {
        self.set(key, value)
    }

    /// Writes a single-precision float.
    pub fn set_float(&mut self, key: &str, value: f32) -> Touch {
        self.set(key, value)
    }

    /// Writes a double.
    pub fn set_double(&mut self, key: &str, value: f64) -> Touch {
        self.set(key, value)
    }

    /// Writes a string.
    pub fn set_string(&mut self, key: &str, value: &str) -> Touch {
        self.set(key, value.to_string())
    }

    /// Writes a byte blob.
    pub fn set_bytes(&mut self, key: &str, value: &[u8]) -> Touch {
        self.set(key, value.to_vec())
    }

    /// Deletes `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Touch {
        match self
            .document
            .as_mut()
            .and_then(|document| document.shift_remove(key))
        {
            Some(_) => Touch::ValueChanged,
            None => Touch::Unchanged,
        }
    }

    /// Returns true if `key` holds any value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.document
            .as_ref()
            .is_some_and(|document| document.contains_key(key))
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document.as_ref().map_or(0, Map::len)
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.document
            .iter()
            .flat_map(|document| document.keys().map(String::as_str))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
