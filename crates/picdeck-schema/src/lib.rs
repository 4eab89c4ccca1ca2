//! Schema store and validation for picdeck rendering contexts.
//!
//! [`SchemaStore`] maps fully-qualified type identifiers to JSON-Schema
//! (draft 2020-12) documents and implements
//! [`SchemaValidator`](picdeck_core::SchemaValidator). A process-wide store
//! is installed explicitly with [`install`] or [`load_global_once`] before
//! the first build; [`reset_global`] clears it for isolated tests.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod global;
pub mod store;
mod validate;

pub use error::SchemaError;
pub use global::{global, install, load_global_once, reset_global};
pub use store::SchemaStore;
