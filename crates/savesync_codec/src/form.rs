//! Form-encoded request bodies.
//!
//! The save server expects `name=value` pairs joined with `&`, where the
//! only escaped character is `+` (sent as `%2B`). Base64 tokens contain `+`
//! but never `&`, so this narrow substitution is all the protocol needs.
//! It is not a general URL encoder.

use crate::error::{CodecError, CodecResult};

const PLUS_ESCAPE: &str = "%2B";

/// Replaces every `+` with `%2B` and leaves everything else untouched.
#[must_use]
pub fn escape_form_body(body: &str) -> String {
    body.replace('+', PLUS_ESCAPE)
}

/// Reverses [`escape_form_body`] for one value.
#[must_use]
pub fn unescape_form_value(value: &str) -> String {
    value.replace(PLUS_ESCAPE, "+")
}

/// Builds a form body from ordered fields.
#[derive(Debug, Clone, Default)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    /// Creates an empty form body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    /// Joins the fields and applies [`escape_form_body`] to the result.
    pub fn finish(&self) -> String {
        let joined = self
            .fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        escape_form_body(&joined)
    }
}

/// Splits a form body into unescaped `(name, value)` pairs.
///
/// # Errors
///
/// Returns an error if a non-empty segment has no `=` or an empty name.
pub fn parse_form_body(body: &str) -> CodecResult<Vec<(String, String)>> {
    body.split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (name, value) = segment
                .split_once('=')
                .ok_or_else(|| CodecError::malformed_form(format!("missing '=' in {segment:?}")))?;
            if name.is_empty() {
                return Err(CodecError::malformed_form("empty field name"));
            }
            Ok((unescape_form_value(name), unescape_form_value(value)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plus_is_escaped() {
        assert_eq!(escape_form_body("a+b/c=d&e f"), "a%2Bb/c=d&e f");
        assert_eq!(escape_form_body("++"), "%2B%2B");
        assert_eq!(escape_form_body(""), "");
    }

    #[test]
    fn builder_joins_in_order() {
        let body = FormBody::new()
            .field("user_id", "ab+c==")
            .field("sn", 7.to_string())
            .field("version", "0.0.1")
            .finish();
        assert_eq!(body, "user_id=ab%2Bc==&sn=7&version=0.0.1");
    }

    #[test]
    fn parse_reverses_builder() {
        let body = FormBody::new()
            .field("user_id", "x+y/z=")
            .field("save_data", "")
            .finish();
        let pairs = parse_form_body(&body).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("user_id".to_string(), "x+y/z=".to_string()),
                ("save_data".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn value_may_contain_equals() {
        let pairs = parse_form_body("t=YWJj==").unwrap();
        assert_eq!(pairs, vec![("t".to_string(), "YWJj==".to_string())]);
    }

    #[test]
    fn malformed_segments_rejected() {
        assert!(parse_form_body("user_id").is_err());
        assert!(parse_form_body("=value").is_err());
        assert!(parse_form_body("").unwrap().is_empty());
    }
}
