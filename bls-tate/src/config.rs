//! Search bounds and size limits for the pipeline.
//!
//! Every exhaustive loop in the crate is bounded by one of these values, so a
//! request's running time is predictable from its parameters.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BlsError, Result};

/// Largest characteristic accepted by default. Point counting is O(p).
pub const DEFAULT_MAX_PRIME: u64 = 1_000_003;

/// Largest embedding degree searched by default.
pub const DEFAULT_MAX_EMBEDDING_DEGREE: u32 = 12;

/// Candidates tried by the order-r point search by default.
pub const DEFAULT_POINT_SEARCH_WINDOW: u64 = 1 << 16;

/// Tunable limits, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// Largest accepted field characteristic `p`.
    pub max_prime: u64,
    /// Upper bound for the embedding-degree search.
    pub max_embedding_degree: u32,
    /// Number of extension-field x-coordinates tried when looking for `Q`.
    pub point_search_window: u64,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            max_prime: DEFAULT_MAX_PRIME,
            max_embedding_degree: DEFAULT_MAX_EMBEDDING_DEGREE,
            point_search_window: DEFAULT_POINT_SEARCH_WINDOW,
        }
    }
}

impl SchemeConfig {
    /// Parse a JSON document such as `{"max_embedding_degree": 4}`.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: SchemeConfig = serde_json::from_str(s)
            .map_err(|e| BlsError::validation(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| BlsError::validation(format!("config {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.max_prime < 3 {
            return Err(BlsError::validation("config: max_prime must be at least 3"));
        }
        if self.max_embedding_degree == 0 {
            return Err(BlsError::validation(
                "config: max_embedding_degree must be positive",
            ));
        }
        if self.point_search_window == 0 {
            return Err(BlsError::validation(
                "config: point_search_window must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchemeConfig::default();
        assert_eq!(config.max_prime, DEFAULT_MAX_PRIME);
        assert_eq!(config.max_embedding_degree, 12);
        assert_eq!(config.point_search_window, 65_536);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SchemeConfig::from_json_str(r#"{"max_embedding_degree": 4}"#).unwrap();
        assert_eq!(config.max_embedding_degree, 4);
        assert_eq!(config.max_prime, DEFAULT_MAX_PRIME);
    }

    #[test]
    fn test_rejects_zero_window() {
        let err = SchemeConfig::from_json_str(r#"{"point_search_window": 0}"#).unwrap_err();
        assert!(matches!(err, BlsError::Validation(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(SchemeConfig::from_json_str("{not json").is_err());
    }
}
