//! Requirements and their resolution.
//!
//! Independent declarers register [`Requirement`]s on a shared aggregate
//! (usually a species) without knowing whether or when the aggregate can
//! satisfy them. Once every declarer has spoken, [`resolve`] filters,
//! conflict-checks, merges and deduplicates the bag in registration order,
//! then constructs the surviving entries.
//!
//! A requirement is either a value ([`Requirement::Direct`]) or an intent
//! to construct one later ([`Requirement::Delayed`], backed by a
//! [`DelayedConstruction`] implementation).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bag;
pub mod requirement;
pub mod resolve;

pub use bag::RequirementBag;
pub use requirement::{
    same_metadata, Category, DelayedConstruction, Requirable, Requirement,
};
pub use resolve::{resolve, RequirementConflict, ResolveError};
