//! # SaveSync Protocol
//!
//! Wire messages for the SaveSync load/save exchange.
//!
//! This crate provides:
//! - [`LoadRequest`] / [`LoadResponse`]
//! - [`SaveRequest`] / [`SaveResponse`]
//!
//! Tokens inside the messages are opaque here; producing and reading them
//! is the codec's job. This is a pure protocol crate with no I/O.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    LoadRequest, LoadResponse, SaveRequest, SaveResponse, DONE_BODY, FIELD_SAVE_DATA, FIELD_SN,
    FIELD_USER_ID, FIELD_VERSION, NULL_BODY,
};
