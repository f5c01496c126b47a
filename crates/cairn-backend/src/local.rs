//! Directory-backed storage.
//!
//! Layout on disk:
//!
//! ```text
//! <root>/
//!   data/<hex id>
//!   keys/<hex id>
//!   locks/<hex id>
//!   snapshots/<hex id>
//!   index/<hex id>
//!   config/<hex id>
//! ```
//!
//! Listings enumerate a kind's directory on a worker thread that stops as
//! soon as the listing is cancelled.

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use cairn_crypto::{ContentHasher, Digest, Sha256};
use cairn_types::{ObjectId, ObjectKind};
use tracing::{debug, warn};

use crate::error::BackendResult;
use crate::listing::{Listing, ListingSink};
use crate::reader::BlobReader;
use crate::traits::Lister;

/// Names buffered between the listing worker and its consumer.
const LIST_BUFFER: usize = 64;

/// Backend storing one file per object under a root directory.
#[derive(Debug)]
pub struct LocalBackend<D = Sha256> {
    root: PathBuf,
    hasher: ContentHasher<D>,
}

impl LocalBackend<Sha256> {
    /// Backend rooted at `root`, hashing with SHA-256.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_hasher(root, ContentHasher::default())
    }
}

impl<D: Digest> LocalBackend<D> {
    /// Backend rooted at `root` with an explicit hasher.
    pub fn with_hasher(root: impl Into<PathBuf>, hasher: ContentHasher<D>) -> Self {
        Self {
            root: root.into(),
            hasher,
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the object `name` of `kind`.
    pub fn path_for(&self, kind: ObjectKind, name: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(name)
    }

    /// Write `data` under its content hash and return the id.
    ///
    /// The file is written to a temporary name and renamed into place, so a
    /// listing never sees a partially written object.
    pub fn save(&self, kind: ObjectKind, data: &[u8]) -> BackendResult<ObjectId> {
        let id = self.hasher.hash(data);
        let path = self.path_for(kind, &id.to_hex());
        if path.exists() {
            return Ok(id);
        }
        let dir = self.root.join(kind.dir_name());
        fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::Builder::new().prefix(".tmp").tempfile_in(&dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(%kind, id = %id.short_hex(), len = data.len(), "saved object");
        Ok(id)
    }

    /// Open `length` bytes of an object starting at `offset`.
    pub fn open(
        &self,
        kind: ObjectKind,
        id: &ObjectId,
        offset: u64,
        length: u64,
    ) -> BackendResult<BlobReader<File>> {
        let mut file = File::open(self.path_for(kind, &id.to_hex()))?;
        file.seek(SeekFrom::Start(offset))?;
        Ok(BlobReader::new(file, length))
    }

    /// Delete an object. Returns `true` if it existed.
    pub fn remove(&self, kind: ObjectKind, id: &ObjectId) -> BackendResult<bool> {
        match fs::remove_file(self.path_for(kind, &id.to_hex())) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl<D: Digest + Send + Sync> Lister for LocalBackend<D> {
    fn list(&self, kind: ObjectKind) -> Listing {
        let dir = self.root.join(kind.dir_name());
        Listing::spawn(LIST_BUFFER, move |sink| list_dir(&dir, kind, &sink))
    }
}

fn list_dir(dir: &Path, kind: ObjectKind, sink: &ListingSink) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!(%kind, dir = %dir.display(), error = %e, "failed to list objects");
            sink.fail(e.into());
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(%kind, dir = %dir.display(), error = %e, "failed to read directory entry");
                sink.fail(e.into());
                return;
            }
        };
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        // In-flight writes.
        if name.starts_with('.') {
            continue;
        }
        if !sink.send(name) {
            debug!(%kind, "listing cancelled");
            return;
        }
    }
}
