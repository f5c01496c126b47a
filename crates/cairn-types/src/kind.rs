use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The category an object belongs to.
///
/// Kinds partition the identifier namespace: prefix lookups and prefix-length
/// calculations are always scoped to a single kind, and ids in different
/// kinds never collide with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Packed file contents.
    Data,
    /// Repository key material.
    Key,
    /// Repository locks.
    Lock,
    /// Point-in-time snapshot records.
    Snapshot,
    /// Index files mapping blobs to data objects.
    Index,
    /// Repository configuration.
    Config,
}

impl ObjectKind {
    /// Every kind, in declaration order.
    pub const ALL: [ObjectKind; 6] = [
        Self::Data,
        Self::Key,
        Self::Lock,
        Self::Snapshot,
        Self::Index,
        Self::Config,
    ];

    /// Name of the directory holding objects of this kind in a local layout.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Key => "keys",
            Self::Lock => "locks",
            Self::Snapshot => "snapshots",
            Self::Index => "index",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "data"),
            Self::Key => write!(f, "key"),
            Self::Lock => write!(f, "lock"),
            Self::Snapshot => write!(f, "snapshot"),
            Self::Index => write!(f, "index"),
            Self::Config => write!(f, "config"),
        }
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for kind in ObjectKind::ALL {
            let parsed: ObjectKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            "tree".parse::<ObjectKind>(),
            Err(TypeError::UnknownKind("tree".into()))
        );
    }

    #[test]
    fn dir_names_are_distinct() {
        let mut names: Vec<_> = ObjectKind::ALL.iter().map(|k| k.dir_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ObjectKind::ALL.len());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ObjectKind::Snapshot).unwrap();
        assert_eq!(json, "\"snapshot\"");
    }
}
