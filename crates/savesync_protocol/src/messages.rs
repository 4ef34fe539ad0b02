//! Request and response messages.
//!
//! Requests are form bodies (`name=value&...`, only `+` escaped). Responses
//! are plain text: a load answers `NULL` or a JSON envelope, a save answers
//! `Done` or a reason for refusing.

use crate::error::{ProtocolError, ProtocolResult};
use savesync_codec::{parse_form_body, FormBody};
use serde::Deserialize;

/// Load response body meaning no save exists for the user.
pub const NULL_BODY: &str = "NULL";

/// Save response body meaning the save was accepted.
pub const DONE_BODY: &str = "Done";

/// Form field carrying the encrypted user identity.
pub const FIELD_USER_ID: &str = "user_id";
/// Form field carrying the sequence number.
pub const FIELD_SN: &str = "sn";
/// Form field carrying the application version.
pub const FIELD_VERSION: &str = "version";
/// Form field carrying the encrypted document.
pub const FIELD_SAVE_DATA: &str = "save_data";

/// Request for the stored save of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Codec token of the user identity.
    pub user_token: String,
}

impl LoadRequest {
    /// Creates a load request.
    pub fn new(user_token: impl Into<String>) -> Self {
        Self {
            user_token: user_token.into(),
        }
    }

    /// Encodes to a form body.
    pub fn encode(&self) -> String {
        FormBody::new()
            .field(FIELD_USER_ID, self.user_token.as_str())
            .finish()
    }

    /// Decodes from a form body.
    pub fn decode(body: &str) -> ProtocolResult<Self> {
        let fields = Fields::parse(body)?;
        Ok(Self {
            user_token: fields.required(FIELD_USER_ID)?.to_string(),
        })
    }
}

/// Request to store a new save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Codec token of the user identity.
    pub user_token: String,
    /// Sequence number of this save.
    pub sn: u64,
    /// Application version that produced the save.
    pub version: String,
    /// Codec token of the serialized document.
    pub save_data: String,
}

impl SaveRequest {
    /// Encodes to a form body.
    pub fn encode(&self) -> String {
        FormBody::new()
            .field(FIELD_USER_ID, self.user_token.as_str())
            .field(FIELD_SN, self.sn.to_string())
            .field(FIELD_VERSION, self.version.as_str())
            .field(FIELD_SAVE_DATA, self.save_data.as_str())
            .finish()
    }

    /// Decodes from a form body.
    pub fn decode(body: &str) -> ProtocolResult<Self> {
        let fields = Fields::parse(body)?;
        let sn = fields
            .required(FIELD_SN)?
            .parse::<u64>()
            .map_err(|e| ProtocolError::invalid_field(FIELD_SN, e.to_string()))?;

        Ok(Self {
            user_token: fields.required(FIELD_USER_ID)?.to_string(),
            sn,
            version: fields.required(FIELD_VERSION)?.to_string(),
            save_data: fields.required(FIELD_SAVE_DATA)?.to_string(),
        })
    }
}

/// Answer to a [`LoadRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResponse {
    /// No save exists yet.
    Empty,
    /// The stored save.
    Found {
        /// Sequence number of the stored save.
        sn: u64,
        /// Codec token of the stored document.
        save_data: String,
    },
}

#[derive(Deserialize)]
struct Envelope {
    sn: u64,
    save_data: String,
}

impl LoadResponse {
    /// Encodes to a response body.
    pub fn encode(&self) -> String {
        match self {
            LoadResponse::Empty => NULL_BODY.to_string(),
            LoadResponse::Found { sn, save_data } => serde_json::json!({
                "sn": sn,
                "save_data": save_data,
            })
            .to_string(),
        }
    }

    /// Decodes a response body.
    ///
    /// The body must be exactly `NULL` or a JSON object with an unsigned
    /// `sn` and a string `save_data`. Other fields are ignored.
    pub fn decode(body: &[u8]) -> ProtocolResult<Self> {
        if body.is_empty() {
            return Err(ProtocolError::EmptyBody);
        }
        let text = std::str::from_utf8(body).map_err(|_| ProtocolError::InvalidUtf8)?;
        if text == NULL_BODY {
            return Ok(LoadResponse::Empty);
        }

        let envelope: Envelope = serde_json::from_str(text)
            .map_err(|e| ProtocolError::MalformedEnvelope(e.to_string()))?;
        Ok(LoadResponse::Found {
            sn: envelope.sn,
            save_data: envelope.save_data,
        })
    }
}

/// Answer to a [`SaveRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResponse {
    /// The save was stored.
    Done,
    /// The server refused; carries the body text.
    Rejected(String),
}

impl SaveResponse {
    /// Creates a rejection.
    pub fn rejected(reason: impl Into<String>) -> Self {
        SaveResponse::Rejected(reason.into())
    }

    /// Encodes to a response body.
    pub fn encode(&self) -> String {
        match self {
            SaveResponse::Done => DONE_BODY.to_string(),
            SaveResponse::Rejected(reason) => reason.clone(),
        }
    }

    /// Decodes a response body. Never fails: anything but `Done` is a
    /// rejection.
    pub fn decode(body: &[u8]) -> Self {
        if body == DONE_BODY.as_bytes() {
            SaveResponse::Done
        } else {
            SaveResponse::Rejected(String::from_utf8_lossy(body).into_owned())
        }
    }

    /// Returns true for [`SaveResponse::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, SaveResponse::Done)
    }
}

/// Parsed form fields with first-wins lookup.
struct Fields(Vec<(String, String)>);

impl Fields {
    fn parse(body: &str) -> ProtocolResult<Self> {
        Ok(Self(parse_form_body(body)?))
    }

    fn required(&self, name: &'static str) -> ProtocolResult<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .ok_or(ProtocolError::MissingField(name))
    }
}
