//! Core types and traits for picdeck.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! abstractions shared by every other picdeck crate: species identifiers,
//! the construction-time and serialization-time error taxonomy, the
//! rendered-object protocol, and closed tagged groups.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod check;
pub mod error;
pub mod group;
pub mod id;
pub mod render;
pub mod units;
pub mod unsupported;

pub use error::{RenderError, ValidationError};
pub use group::{tagged_wrapper, TaggedGroup};
pub use id::SpeciesId;
pub use render::{RenderContext, RenderedObject, SchemaValidator, SideFileSink};
pub use unsupported::check_unsupported;

/// Re-exported so that rendered objects can name the context value type
/// without depending on `serde_json` directly.
pub use serde_json::{Map, Value};
