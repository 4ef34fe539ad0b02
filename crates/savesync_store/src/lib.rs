//! # SaveSync Store
//!
//! A flat, insertion-ordered JSON object holding typed save values.
//!
//! Getters materialize their default when a key is absent; setters only
//! write when the value actually changes. Both report a [`Touch`] so a
//! session can decide whether to save.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod store;
mod value;

pub use error::{StoreError, StoreResult};
pub use store::SaveStore;
pub use value::{SaveValue, Touch};
