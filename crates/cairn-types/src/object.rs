use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Content-addressed identifier for any stored object.
///
/// An `ObjectId` is the 32-byte digest of an object's content. Identical
/// content always produces the same `ObjectId`; the digest itself is chosen
/// by the hasher that produced it (see `cairn-crypto`). Equal ids are assumed
/// to name equal content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    /// Size of an id in bytes.
    pub const LEN: usize = 32;

    /// Width of the canonical hex form.
    pub const HEX_LEN: usize = Self::LEN * 2;

    /// Create an `ObjectId` from a pre-computed hash.
    pub fn from_hash(hash: [u8; Self::LEN]) -> Self {
        Self(hash)
    }

    /// The null object ID (all zeros). Represents "no object".
    pub const fn null() -> Self {
        Self([0u8; Self::LEN])
    }

    /// Returns `true` if this is the null object ID.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; Self::LEN]
    }

    /// A random id, for tests and demos.
    pub fn random() -> Self {
        let mut bytes = [0u8; Self::LEN];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Hex-encoded string representation. Always [`ObjectId::HEX_LEN`] chars.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Returns `true` if the hex form of this id starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(prefix)
    }

    /// Parse from a full-width hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != Self::LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; Self::LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for ObjectId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ObjectId> for [u8; 32] {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn null_is_all_zeros() {
        let null = ObjectId::null();
        assert!(null.is_null());
        assert_eq!(null.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn hex_keeps_leading_zero_bytes() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let id = ObjectId::from_hash(bytes);
        let hex = id.to_hex();
        assert_eq!(hex.len(), ObjectId::HEX_LEN);
        assert!(hex.starts_with("0000"));
        assert_eq!(ObjectId::from_hex(&hex).unwrap(), id);
    }

    #[test]
    fn short_hex_is_8_chars() {
        let id = ObjectId::random();
        assert_eq!(id.short_hex().len(), 8);
        assert!(id.to_hex().starts_with(&id.short_hex()));
    }

    #[test]
    fn display_is_full_hex() {
        let id = ObjectId::from_hash([0xab; 32]);
        let display = format!("{id}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, id.to_hex());
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(
            ObjectId::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert_eq!(
            ObjectId::from_hex("abcd"),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn from_str_parses_full_hex() {
        let id = ObjectId::from_hash([7; 32]);
        let parsed: ObjectId = id.to_hex().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn has_prefix_matches_hex_form() {
        let id = ObjectId::from_hash([0xab; 32]);
        assert!(id.has_prefix("abab"));
        assert!(id.has_prefix(""));
        assert!(!id.has_prefix("abac"));
    }

    #[test]
    fn serde_uses_hex_string() {
        let id = ObjectId::from_hash([0x01; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn ordering_is_consistent() {
        let id1 = ObjectId::from_hash([0; 32]);
        let id2 = ObjectId::from_hash([1; 32]);
        assert!(id1 < id2);
    }

    proptest! {
        #[test]
        fn hex_roundtrip(bytes in any::<[u8; 32]>()) {
            let id = ObjectId::from_hash(bytes);
            let hex = id.to_hex();
            prop_assert_eq!(hex.len(), ObjectId::HEX_LEN);
            prop_assert_eq!(ObjectId::from_hex(&hex).unwrap(), id);
        }
    }
}
