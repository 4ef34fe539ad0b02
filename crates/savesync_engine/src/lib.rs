//! # SaveSync Engine
//!
//! Session state machine for SaveSync.
//!
//! This crate provides:
//! - [`SyncSession`]: init/release lifecycle, typed accessors, async load and
//!   save with a monotonically increasing sequence number
//! - [`SyncTicket`]: a future resolving once per request, plus per-session
//!   completion callbacks
//! - [`HttpClient`] abstraction with mock, loopback and (feature `http`)
//!   `reqwest` implementations
//!
//! ## Exchange
//!
//! A load posts the encrypted identity and replaces the local document with
//! the server's copy (`NULL` means "no save yet"). A save increments the
//! sequence number, then posts identity, sequence number, version and the
//! encrypted document; only the body `Done` counts as success.
//!
//! ## Key Invariants
//!
//! - At most one request is in flight; explicit calls while busy fail with
//!   [`SyncError::Busy`], automatic saves are queued
//! - The sequence number is incremented before each save is sent and is
//!   never rolled back
//! - Failed loads leave the document and sequence number untouched
//! - Every dispatched request invokes its callback exactly once

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod session;
mod state;
mod ticket;
mod transport;

pub use config::{SessionConfig, MIN_SECRET_LEN};
pub use error::{ErrorKind, SyncError, SyncResult};
#[cfg(feature = "http")]
pub use http::ReqwestClient;
pub use http::{request_path, HttpClient, HttpResponse, LoopbackClient, LoopbackServer};
pub use session::{LoadCallback, SaveCallback, SyncSession};
pub use state::{LoadOutcome, SaveOutcome, SessionState};
pub use ticket::SyncTicket;
pub use transport::{MockClient, RecordedRequest};
