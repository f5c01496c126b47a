use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cairn_crypto::{ContentHasher, Digest, Sha256};
use cairn_types::{ObjectId, ObjectKind};

use crate::error::{BackendError, BackendResult};
use crate::listing::Listing;
use crate::reader::BlobReader;
use crate::traits::Lister;

type Objects = HashMap<ObjectKind, BTreeMap<String, Vec<u8>>>;

/// In-memory, HashMap-based backend.
///
/// Intended for tests and embedding. Objects are grouped by kind and keyed by
/// name; listings come out in sorted name order.
pub struct InMemoryBackend<D = Sha256> {
    objects: RwLock<Objects>,
    hasher: ContentHasher<D>,
}

impl InMemoryBackend<Sha256> {
    /// Create a new empty backend hashing with SHA-256.
    pub fn new() -> Self {
        Self::with_hasher(ContentHasher::default())
    }
}

impl Default for InMemoryBackend<Sha256> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> InMemoryBackend<D> {
    /// Create a new empty backend with an explicit hasher.
    pub fn with_hasher(hasher: ContentHasher<D>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            hasher,
        }
    }

    /// Store `data` under its content hash and return the id.
    ///
    /// Idempotent: saving the same content twice keeps one object.
    pub fn save(&self, kind: ObjectKind, data: &[u8]) -> BackendResult<ObjectId> {
        let id = self.hasher.hash(data);
        self.write()?
            .entry(kind)
            .or_default()
            .entry(id.to_hex())
            .or_insert_with(|| data.to_vec());
        Ok(id)
    }

    /// Store `data` under an arbitrary name, bypassing hashing.
    pub fn insert(
        &self,
        kind: ObjectKind,
        name: impl Into<String>,
        data: Vec<u8>,
    ) -> BackendResult<()> {
        self.write()?
            .entry(kind)
            .or_default()
            .insert(name.into(), data);
        Ok(())
    }

    /// Read a whole object.
    pub fn load(&self, kind: ObjectKind, id: &ObjectId) -> BackendResult<Vec<u8>> {
        self.read()?
            .get(&kind)
            .and_then(|objects| objects.get(&id.to_hex()))
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    /// Open `length` bytes of an object starting at `offset`.
    pub fn open(
        &self,
        kind: ObjectKind,
        id: &ObjectId,
        offset: u64,
        length: u64,
    ) -> BackendResult<BlobReader<Cursor<Vec<u8>>>> {
        let data = self.load(kind, id)?;
        let mut cursor = Cursor::new(data);
        cursor.set_position(offset);
        Ok(BlobReader::new(cursor, length))
    }

    /// Delete an object. Returns `true` if it existed.
    pub fn remove(&self, kind: ObjectKind, id: &ObjectId) -> BackendResult<bool> {
        Ok(self
            .write()?
            .get_mut(&kind)
            .is_some_and(|objects| objects.remove(&id.to_hex()).is_some()))
    }

    /// Number of objects of `kind`.
    pub fn len(&self, kind: ObjectKind) -> usize {
        self.read()
            .map(|objects| objects.get(&kind).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// Returns `true` if no objects of `kind` are stored.
    pub fn is_empty(&self, kind: ObjectKind) -> bool {
        self.len(kind) == 0
    }

    fn read(&self) -> BackendResult<RwLockReadGuard<'_, Objects>> {
        self.objects
            .read()
            .map_err(|e| BackendError::Provider(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> BackendResult<RwLockWriteGuard<'_, Objects>> {
        self.objects
            .write()
            .map_err(|e| BackendError::Provider(format!("lock poisoned: {e}")))
    }
}

impl<D: Digest + Send + Sync> Lister for InMemoryBackend<D> {
    fn list(&self, kind: ObjectKind) -> Listing {
        match self.read() {
            Ok(objects) => Listing::from_names(
                objects
                    .get(&kind)
                    .map(|names| names.keys().cloned().collect::<Vec<_>>())
                    .unwrap_or_default(),
            ),
            Err(e) => Listing::failed(e),
        }
    }
}

impl<D> std::fmt::Debug for InMemoryBackend<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count: usize = self
            .objects
            .read()
            .map(|objects| objects.values().map(BTreeMap::len).sum())
            .unwrap_or(0);
        f.debug_struct("InMemoryBackend")
            .field("object_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find::{find, find_snapshot, prefix_length, PrefixResolver};
    use cairn_crypto::Blake3;
    use std::io::Read;

    #[test]
    fn save_and_load() {
        let backend = InMemoryBackend::new();
        let id = backend.save(ObjectKind::Data, b"hello world").unwrap();
        assert_eq!(id, cairn_crypto::hash(b"hello world"));
        assert_eq!(backend.load(ObjectKind::Data, &id).unwrap(), b"hello world");
    }

    #[test]
    fn save_is_idempotent() {
        let backend = InMemoryBackend::new();
        let a = backend.save(ObjectKind::Data, b"same").unwrap();
        let b = backend.save(ObjectKind::Data, b"same").unwrap();
        assert_eq!(a, b);
        assert_eq!(backend.len(ObjectKind::Data), 1);
    }

    #[test]
    fn load_missing_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend.load(ObjectKind::Data, &ObjectId::random()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn kinds_are_separate_namespaces() {
        let backend = InMemoryBackend::new();
        let id = backend.save(ObjectKind::Data, b"payload").unwrap();
        backend.save(ObjectKind::Snapshot, b"payload").unwrap();

        // Same id in two kinds is not ambiguous within either.
        let prefix = &id.to_hex()[..8];
        assert_eq!(find(&backend, ObjectKind::Data, prefix).unwrap(), id.to_hex());
        assert_eq!(find_snapshot(&backend, prefix).unwrap(), id.to_hex());
        assert!(find(&backend, ObjectKind::Index, prefix)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn listing_is_sorted() {
        let backend = InMemoryBackend::new();
        for name in ["cc", "aa", "bb"] {
            backend.insert(ObjectKind::Lock, name, Vec::new()).unwrap();
        }
        let names: Vec<String> = backend
            .list(ObjectKind::Lock)
            .collect::<BackendResult<_>>()
            .unwrap();
        assert_eq!(names, vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn sorted_listing_makes_prefix_length_global() {
        let backend = InMemoryBackend::new();
        let a = format!("{:0<64}", "aaaaaaaa1");
        let b = format!("{:0<64}", "bbbbbbbb");
        let c = format!("{:0<64}", "aaaaaaaa2");
        for name in [&a, &b, &c] {
            backend.insert(ObjectKind::Data, name.clone(), Vec::new()).unwrap();
        }
        assert_eq!(prefix_length(&backend, ObjectKind::Data).unwrap(), 9);
    }

    #[test]
    fn open_reads_requested_range() {
        let backend = InMemoryBackend::new();
        let id = backend.save(ObjectKind::Data, b"0123456789").unwrap();
        let mut reader = backend.open(ObjectKind::Data, &id, 2, 5).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"23456");
        assert!(reader.is_closed());
    }

    #[test]
    fn remove_deletes_object() {
        let backend = InMemoryBackend::new();
        let id = backend.save(ObjectKind::Key, b"key").unwrap();
        assert!(backend.remove(ObjectKind::Key, &id).unwrap());
        assert!(!backend.remove(ObjectKind::Key, &id).unwrap());
        assert!(backend.is_empty(ObjectKind::Key));
    }

    #[test]
    fn injected_hasher_names_objects() {
        let backend = InMemoryBackend::with_hasher(ContentHasher::new(Blake3));
        let id = backend.save(ObjectKind::Data, b"x").unwrap();
        assert_eq!(id, ContentHasher::new(Blake3).hash(b"x"));
        assert_ne!(id, cairn_crypto::hash(b"x"));
    }

    #[test]
    fn resolver_over_backend() {
        let backend = InMemoryBackend::new();
        let id = backend.save(ObjectKind::Snapshot, b"snap").unwrap();
        let resolver = PrefixResolver::new(&backend);
        assert_eq!(resolver.find_id(ObjectKind::Snapshot, &id.short_hex()).unwrap(), id);
        assert_eq!(
            resolver.short_id(ObjectKind::Snapshot, &id).unwrap(),
            id.short_hex()
        );
    }

    #[test]
    fn debug_reports_count() {
        let backend = InMemoryBackend::new();
        backend.save(ObjectKind::Data, b"a").unwrap();
        backend.save(ObjectKind::Index, b"b").unwrap();
        assert_eq!(format!("{backend:?}"), "InMemoryBackend { object_count: 2 }");
    }
}
