//! # SaveSync Codec
//!
//! Transport encoding for SaveSync payloads.
//!
//! This crate provides:
//! - [`Codec`]: AES-128-CBC with zero padding, then standard base64
//! - Form bodies with the narrow `+` → `%2B` escaping the server expects
//!
//! ## Usage
//!
//! ```
//! use savesync_codec::Codec;
//!
//! let codec = Codec::from_material(b"1a2b3c4d5e6f7g8h", b"#this_is_not_key").unwrap();
//! let token = codec.encode(b"{\"coins\":10}");
//! assert_eq!(codec.decode_text(&token).unwrap(), "{\"coins\":10}");
//! ```
//!
//! ## Limitations
//!
//! Zero padding records no length, so [`Codec::decode`] cannot recover the
//! original length on its own. Callers either know the length or carry
//! payloads (such as JSON text) that tolerate trailing NUL bytes.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod form;
mod token;

pub use error::{CodecError, CodecResult};
pub use form::{escape_form_body, parse_form_body, unescape_form_value, FormBody};
pub use token::{trim_zero_padding, Codec};
