//! Value types that can live in a save document.

use base64::{engine::general_purpose, Engine as _};
use serde_json::{Number, Value};

/// Outcome of an accessor call, used to drive auto-save policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touch {
    /// The document was not modified.
    Unchanged,
    /// A getter stored its default because the key was absent or held
    /// another type.
    DefaultPersisted,
    /// A setter stored a new value.
    ValueChanged,
}

impl Touch {
    /// Returns true if the document was modified.
    pub fn is_modified(self) -> bool {
        !matches!(self, Touch::Unchanged)
    }
}

/// A type that maps onto one JSON shape in the save document.
///
/// Each implementation decides which stored JSON values count as "the same
/// type". A value of another shape is treated like an absent key.
pub trait SaveValue: Sized {
    /// Extracts a value if `json` holds this type.
    fn from_json(json: &Value) -> Option<Self>;

    /// Converts to JSON, or `None` if the value has no JSON form.
    fn to_json(&self) -> Option<Value>;

    /// Returns true if `stored` already holds exactly this value.
    fn same_as(&self, stored: &Value) -> bool;
}

impl SaveValue for bool {
    fn from_json(json: &Value) -> Option<Self> {
        json.as_bool()
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }

    fn same_as(&self, stored: &Value) -> bool {
        stored.as_bool() == Some(*self)
    }
}

impl SaveValue for i32 {
    fn from_json(json: &Value) -> Option<Self> {
        json.as_i64().and_then(|n| i32::try_from(n).ok())
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::from(*self))
    }

    fn same_as(&self, stored: &Value) -> bool {
        Self::from_json(stored) == Some(*self)
    }
}

/// Single-precision floats are stored as JSON doubles.
impl SaveValue for f32 {
    fn from_json(json: &Value) -> Option<Self> {
        float_of(json).map(|n| n as f32)
    }

    fn to_json(&self) -> Option<Value> {
        f64::from(*self).to_json()
    }

    fn same_as(&self, stored: &Value) -> bool {
        float_of(stored) == Some(f64::from(*self))
    }
}

impl SaveValue for f64 {
    fn from_json(json: &Value) -> Option<Self> {
        float_of(json)
    }

    fn to_json(&self) -> Option<Value> {
        Number::from_f64(*self).map(Value::Number)
    }

    fn same_as(&self, stored: &Value) -> bool {
        float_of(stored) == Some(*self)
    }
}

impl SaveValue for String {
    fn from_json(json: &Value) -> Option<Self> {
        json.as_str().map(str::to_string)
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }

    fn same_as(&self, stored: &Value) -> bool {
        stored.as_str() == Some(self.as_str())
    }
}

/// Byte blobs are stored as base64 text.
impl SaveValue for Vec<u8> {
    fn from_json(json: &Value) -> Option<Self> {
        json.as_str()
            .and_then(|text| general_purpose::STANDARD.decode(text).ok())
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::String(general_purpose::STANDARD.encode(self)))
    }

    fn same_as(&self, stored: &Value) -> bool {
        Self::from_json(stored).as_deref() == Some(self.as_slice())
    }
}

/// Integers stored in JSON never match a floating-point accessor.
fn float_of(json: &Value) -> Option<f64> {
    match json {
        Value::Number(n) if n.is_f64() => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_range_checked() {
        assert_eq!(i32::from_json(&json!(42)), Some(42));
        assert_eq!(i32::from_json(&json!(-7)), Some(-7));
        assert_eq!(i32::from_json(&json!(5_000_000_000i64)), None);
        assert_eq!(i32::from_json(&json!(1.5)), None);
        assert_eq!(i32::from_json(&json!("1")), None);
    }

    #[test]
    fn floats_require_floating_json() {
        assert_eq!(f64::from_json(&json!(2.5)), Some(2.5));
        assert_eq!(f64::from_json(&json!(2)), None);
        assert_eq!(f32::from_json(&json!(0.5)), Some(0.5));
    }

    #[test]
    fn non_finite_has_no_json_form() {
        assert!(f64::NAN.to_json().is_none());
        assert!(f64::INFINITY.to_json().is_none());
        assert!(f32::NEG_INFINITY.to_json().is_none());
    }

    #[test]
    fn float_compares_at_double_precision() {
        // 0.1 as a double is not the widened f32 0.1.
        assert!(!0.1f32.same_as(&json!(0.1)));
        assert!(0.5f32.same_as(&json!(0.5)));
    }

    #[test]
    fn bytes_use_base64() {
        let blob = vec![0u8, 1, 2, 255];
        let json = blob.to_json().unwrap();
        assert_eq!(json, json!("AAEC/w=="));
        assert_eq!(Vec::<u8>::from_json(&json), Some(blob.clone()));
        assert!(blob.same_as(&json));
        assert_eq!(Vec::<u8>::from_json(&json!("%%%")), None);
    }

    #[test]
    fn touch_modified() {
        assert!(!Touch::Unchanged.is_modified());
        assert!(Touch::DefaultPersisted.is_modified());
        assert!(Touch::ValueChanged.is_modified());
    }
}
