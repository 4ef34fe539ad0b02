//! # SaveSync Server
//!
//! In-memory reference server for the SaveSync load/save exchange.
//!
//! This crate provides:
//! - Load and save endpoints over form-encoded bodies
//! - Per-user storage of the last accepted save, keyed by the opaque
//!   encrypted identity token
//! - Stale sequence number and payload size checks
//! - A [`LoopbackServer`](savesync_engine::LoopbackServer) implementation so
//!   sessions can talk to it without a network
//!
//! The server never holds key material. Identity tokens and documents stay
//! encrypted end to end.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod records;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::RequestHandler;
pub use records::{SaveRecord, SaveRecords};
pub use server::SaveServer;
