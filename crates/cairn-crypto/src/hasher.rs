use cairn_types::ObjectId;

/// A digest function producing an [`ObjectId`]-sized output.
///
/// Implementations must be deterministic and total over all inputs,
/// including the empty slice.
pub trait Digest {
    /// Digest the full content of `data`.
    fn digest(&self, data: &[u8]) -> [u8; ObjectId::LEN];

    /// Short name of the algorithm, for logs.
    fn name(&self) -> &'static str;
}

/// SHA-256, the default digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256;

impl Digest for Sha256 {
    fn digest(&self, data: &[u8]) -> [u8; ObjectId::LEN] {
        <sha2::Sha256 as sha2::Digest>::digest(data).into()
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// BLAKE3 in its default 256-bit mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3;

impl Digest for Blake3 {
    fn digest(&self, data: &[u8]) -> [u8; ObjectId::LEN] {
        *blake3::hash(data).as_bytes()
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// Hashes object content into identifiers with an injected [`Digest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher<D = Sha256> {
    digest: D,
}

impl<D: Digest> ContentHasher<D> {
    /// Create a hasher backed by `digest`.
    pub const fn new(digest: D) -> Self {
        Self { digest }
    }

    /// Hash raw bytes into an id.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        ObjectId::from_hash(self.digest.digest(data))
    }

    /// Verify that data produces the expected object ID.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        self.hash(data) == *expected
    }

    /// Name of the underlying digest.
    pub fn digest_name(&self) -> &'static str {
        self.digest.name()
    }
}

impl Default for ContentHasher<Sha256> {
    fn default() -> Self {
        Self::new(Sha256)
    }
}

/// Returns the id for `data` using the default digest (SHA-256).
pub fn hash(data: &[u8]) -> ObjectId {
    ContentHasher::new(Sha256).hash(data)
}
