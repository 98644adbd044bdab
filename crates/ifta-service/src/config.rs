//! Configuration for the listing query
//!
//! Defines the homepage page size and the upper bound callers may request.

use serde::{Deserialize, Serialize};

/// Configuration for [`ListingQuery`](crate::ListingQuery)
///
/// # Examples
///
/// ```
/// use ifta_service::ListingConfig;
///
/// let config = ListingConfig::default();
/// assert_eq!(config.recent_limit, 6);
/// assert_eq!(config.clamp(None), 6);
/// assert_eq!(config.clamp(Some(500)), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Entries returned when the caller gives no limit
    /// Default: 6 (the homepage grid)
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Largest limit a caller may ask for
    /// Default: 50
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_recent_limit() -> usize {
    6
}

fn default_max_limit() -> usize {
    50
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl ListingConfig {
    /// Resolve a caller-supplied limit against the configured bounds
    pub fn clamp(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.recent_limit).min(self.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ListingConfig::default();
        assert_eq!(config.recent_limit, 6);
        assert_eq!(config.max_limit, 50);
    }

    #[test]
    fn test_clamp() {
        let config = ListingConfig {
            recent_limit: 3,
            max_limit: 10,
        };
        assert_eq!(config.clamp(None), 3);
        assert_eq!(config.clamp(Some(0)), 0);
        assert_eq!(config.clamp(Some(7)), 7);
        assert_eq!(config.clamp(Some(11)), 10);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ListingConfig = toml::from_str("recent_limit = 4").unwrap();
        assert_eq!(config.recent_limit, 4);
        assert_eq!(config.max_limit, 50);
    }
}
