//! Backend plumbing for cairn.
//!
//! Objects in a cairn repository are named by the 64-character hex form of
//! their content hash. Humans refer to them by short prefixes instead; this
//! crate turns those prefixes back into full names and works out how short a
//! prefix can safely be.
//!
//! # Components
//!
//! - [`Lister`] / [`Listing`] -- cancelable enumeration of the names of one
//!   [`ObjectKind`](cairn_types::ObjectKind)
//! - [`find`] / [`find_snapshot`] -- resolve a prefix to the single matching name
//! - [`prefix_length`] -- shortest prefix length keeping neighbouring names apart
//! - [`PrefixResolver`] -- the above bound to a lister and a [`ResolverConfig`]
//! - [`BlobReader`] -- byte-limited reader that releases its source exactly once
//!
//! # Backends
//!
//! - [`InMemoryBackend`] -- `HashMap`-based store for tests and embedding
//! - [`LocalBackend`] -- one file per object under a root directory
//!
//! # Rules
//!
//! 1. Every listing opened by this crate is cancelled exactly once, on every
//!    exit path.
//! 2. Prefix operations are scoped to a single kind.
//! 3. No retries and no caching: errors go straight back to the caller.

pub mod config;
pub mod error;
pub mod find;
pub mod listing;
pub mod local;
pub mod memory;
pub mod reader;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::ResolverConfig;
pub use error::{BackendError, BackendResult};
pub use find::{
    find, find_snapshot, prefix_length, prefix_length_with_min, shortest_unique_prefix,
    PrefixResolver, MIN_PREFIX_LENGTH,
};
pub use listing::{CancelToken, Listing, ListingSink};
pub use local::LocalBackend;
pub use memory::InMemoryBackend;
pub use reader::{is_closed_access, limit_reader, BlobReader, ReadClose};
pub use traits::Lister;
