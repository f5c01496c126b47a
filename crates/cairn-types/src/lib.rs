//! Foundation types for cairn.
//!
//! This crate provides the identifier and namespace types shared by every
//! other cairn crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Fixed-size content-addressed identifier with a 64-char hex form
//! - [`ObjectKind`] — Category partitioning the identifier namespace
//! - [`TypeError`] — Parse failures for ids and kinds

pub mod error;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use kind::ObjectKind;
pub use object::ObjectId;
