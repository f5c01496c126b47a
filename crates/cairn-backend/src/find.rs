//! Resolving short ID prefixes to full object names.
//!
//! Both operations scan a fresh [`Listing`](crate::Listing) per call and
//! cancel it on every exit path. Nothing is cached between calls.

use cairn_types::{ObjectId, ObjectKind};
use tracing::debug;

use crate::config::ResolverConfig;
use crate::error::{BackendError, BackendResult};
use crate::traits::Lister;

/// Default lower bound for [`prefix_length`].
pub const MIN_PREFIX_LENGTH: usize = 8;

/// Find the single name of kind `kind` that starts with `prefix`.
///
/// Returns [`BackendError::NotFound`] when nothing matches and
/// [`BackendError::AmbiguousPrefix`] as soon as a second, different name
/// matches. A name shorter than `prefix` is compared over its own length
/// only, so it matches when it is itself a prefix of `prefix`.
pub fn find<L: Lister + ?Sized>(
    lister: &L,
    kind: ObjectKind,
    prefix: &str,
) -> BackendResult<String> {
    let mut listing = lister.list(kind);
    let mut found: Option<String> = None;

    for name in &mut listing {
        let name = name?;
        if !prefix_matches(prefix, &name) {
            continue;
        }
        if let Some(first) = &found {
            if *first != name {
                debug!(%kind, prefix, first = %first, second = %name, "ambiguous prefix");
                return Err(BackendError::AmbiguousPrefix);
            }
            continue;
        }
        found = Some(name);
    }

    match found {
        Some(name) => {
            debug!(%kind, prefix, name = %name, "prefix resolved");
            Ok(name)
        }
        None => {
            debug!(%kind, prefix, "no id matches prefix");
            Err(BackendError::NotFound)
        }
    }
}

/// [`find`] restricted to snapshots.
pub fn find_snapshot<L: Lister + ?Sized>(lister: &L, prefix: &str) -> BackendResult<String> {
    find(lister, ObjectKind::Snapshot, prefix)
}

/// Number of leading characters needed so that every name of kind `kind` is
/// told apart from its neighbour, never less than [`MIN_PREFIX_LENGTH`].
pub fn prefix_length<L: Lister + ?Sized>(lister: &L, kind: ObjectKind) -> BackendResult<usize> {
    prefix_length_with_min(lister, kind, MIN_PREFIX_LENGTH)
}

/// [`prefix_length`] with an explicit lower bound.
pub fn prefix_length_with_min<L: Lister + ?Sized>(
    lister: &L,
    kind: ObjectKind,
    min: usize,
) -> BackendResult<usize> {
    let names = lister
        .list(kind)
        .collect::<BackendResult<Vec<String>>>()?;
    let len = shortest_unique_prefix(&names, min);
    debug!(%kind, count = names.len(), len, "computed prefix length");
    Ok(len)
}

/// Shortest length in `[min, ObjectId::HEX_LEN)` at which no two
/// consecutive names share a prefix, or [`ObjectId::HEX_LEN`] if there is none.
///
/// Only neighbours in the given order are compared. Equal prefixes that are
/// not adjacent go unnoticed; callers wanting a global answer must pass the
/// names sorted.
pub fn shortest_unique_prefix<S: AsRef<str>>(names: &[S], min: usize) -> usize {
    (min..ObjectId::HEX_LEN)
        .find(|&len| !has_adjacent_collision(names, len))
        .unwrap_or(ObjectId::HEX_LEN)
}

fn has_adjacent_collision<S: AsRef<str>>(names: &[S], len: usize) -> bool {
    names
        .windows(2)
        .any(|pair| truncated(pair[0].as_ref(), len) == truncated(pair[1].as_ref(), len))
}

fn truncated(name: &str, len: usize) -> &[u8] {
    let bytes = name.as_bytes();
    &bytes[..len.min(bytes.len())]
}

fn prefix_matches(prefix: &str, name: &str) -> bool {
    let len = prefix.len().min(name.len());
    prefix.as_bytes()[..len] == name.as_bytes()[..len]
}

/// Prefix operations bound to one lister and a [`ResolverConfig`].
#[derive(Debug)]
pub struct PrefixResolver<L> {
    lister: L,
    config: ResolverConfig,
}

impl<L: Lister> PrefixResolver<L> {
    /// Resolver with the default configuration.
    pub fn new(lister: L) -> Self {
        Self::with_config(lister, ResolverConfig::default())
    }

    /// Resolver with an explicit configuration.
    pub fn with_config(lister: L, config: ResolverConfig) -> Self {
        Self { lister, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The wrapped lister.
    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// See [`find`].
    pub fn find(&self, kind: ObjectKind, prefix: &str) -> BackendResult<String> {
        find(&self.lister, kind, prefix)
    }

    /// See [`find_snapshot`].
    pub fn find_snapshot(&self, prefix: &str) -> BackendResult<String> {
        find_snapshot(&self.lister, prefix)
    }

    /// Resolve `prefix` and parse the match as an [`ObjectId`].
    pub fn find_id(&self, kind: ObjectKind, prefix: &str) -> BackendResult<ObjectId> {
        let name = self.find(kind, prefix)?;
        Ok(name.parse::<ObjectId>()?)
    }

    /// [`prefix_length`] using the configured minimum.
    pub fn prefix_length(&self, kind: ObjectKind) -> BackendResult<usize> {
        prefix_length_with_min(&self.lister, kind, self.config.min_prefix_length)
    }

    /// Shortest display form of `id` among the objects of `kind`.
    pub fn short_id(&self, kind: ObjectKind, id: &ObjectId) -> BackendResult<String> {
        let len = self.prefix_length(kind)?;
        let mut hex = id.to_hex();
        hex.truncate(len);
        Ok(hex)
    }
}
