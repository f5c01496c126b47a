use std::sync::Arc;

use cairn_types::ObjectKind;

use crate::listing::Listing;

/// A backend that can enumerate the names of stored objects.
///
/// Implementations must satisfy these invariants:
/// - A listing covers exactly one [`ObjectKind`]; names of other kinds never
///   appear in it.
/// - No ordering or de-duplication is promised to consumers.
/// - The producer observes the listing's cancellation promptly, stops
///   emitting names, and releases whatever it holds for the enumeration.
/// - Enumeration failures are yielded as items, not swallowed.
pub trait Lister: Send + Sync {
    /// Open a listing of every object name of the given kind.
    fn list(&self, kind: ObjectKind) -> Listing;
}

impl<T: Lister + ?Sized> Lister for &T {
    fn list(&self, kind: ObjectKind) -> Listing {
        (**self).list(kind)
    }
}

impl<T: Lister + ?Sized> Lister for Box<T> {
    fn list(&self, kind: ObjectKind) -> Listing {
        (**self).list(kind)
    }
}

impl<T: Lister + ?Sized> Lister for Arc<T> {
    fn list(&self, kind: ObjectKind) -> Listing {
        (**self).list(kind)
    }
}
