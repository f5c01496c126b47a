use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BackendError, BackendResult};
use crate::find::MIN_PREFIX_LENGTH;

/// Configuration for prefix resolution.
///
/// Read from TOML; missing fields take their defaults:
///
/// ```toml
/// min_prefix_length = 8
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Shortest prefix length ever reported by the prefix-length calculator.
    pub min_prefix_length: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_prefix_length: MIN_PREFIX_LENGTH,
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> BackendResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| BackendError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> BackendResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> BackendResult<String> {
        toml::to_string(self).map_err(|e| BackendError::Config(e.to_string()))
    }

    /// Check invariants.
    pub fn validate(&self) -> BackendResult<()> {
        if self.min_prefix_length == 0 {
            return Err(BackendError::Config(
                "min_prefix_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ResolverConfig::default();
        assert_eq!(c.min_prefix_length, 8);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn parses_toml() {
        let c = ResolverConfig::from_toml_str("min_prefix_length = 12").unwrap();
        assert_eq!(c.min_prefix_length, 12);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let c = ResolverConfig::from_toml_str("").unwrap();
        assert_eq!(c, ResolverConfig::default());
    }

    #[test]
    fn zero_minimum_is_rejected() {
        let err = ResolverConfig::from_toml_str("min_prefix_length = 0").unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = ResolverConfig::from_toml_str("min_prefix_length = \"eight\"").unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = ResolverConfig {
            min_prefix_length: 10,
        };
        let text = c.to_toml_string().unwrap();
        assert_eq!(ResolverConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_prefix_length = 16").unwrap();
        let c = ResolverConfig::load(file.path()).unwrap();
        assert_eq!(c.min_prefix_length, 16);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResolverConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
