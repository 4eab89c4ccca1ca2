//! Test utilities for picdeck development.
//!
//! Provides toy requirement kinds ([`toys`]) for exercising the resolver
//! without real species, and schema fixtures ([`fixtures`]) for rendering
//! tests: the shipped schema store plus validators that accept or record
//! everything.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod toys;
