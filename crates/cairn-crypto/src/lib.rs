//! Content hashing for cairn.
//!
//! Objects are named by the digest of their bytes. The digest is a strategy
//! value handed to a [`ContentHasher`] rather than process-wide state, so
//! callers (and tests) can swap SHA-256 for BLAKE3 or anything else that
//! yields 32 bytes.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::{hash, Blake3, ContentHasher, Digest, Sha256};
