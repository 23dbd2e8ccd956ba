use serde::{Deserialize, Serialize};

use lww_types::Timestamp;

use crate::error::{MergeError, MergeResult};

/// Configuration for merge passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Fixed default timestamp in nanoseconds. When unset, each pass uses the
    /// wall clock at the moment the pass starts.
    pub default_timestamp: Option<u64>,
    /// Validate that source entries are strictly ascending before merging.
    pub verify_order: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            default_timestamp: None,
            verify_order: true,
        }
    }
}

impl MergeConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> MergeResult<Self> {
        toml::from_str(s).map_err(|e| MergeError::Config(e.to_string()))
    }

    /// A configuration pinned to `timestamp`, for reproducible passes.
    pub fn with_default_timestamp(timestamp: Timestamp) -> Self {
        Self {
            default_timestamp: Some(timestamp.as_nanos()),
            ..Default::default()
        }
    }

    /// The default timestamp for a pass starting now.
    pub fn resolve_default_timestamp(&self) -> MergeResult<Timestamp> {
        match self.default_timestamp {
            Some(0) => Err(MergeError::Config(
                "default_timestamp must be nonzero".into(),
            )),
            Some(nanos) => Ok(Timestamp::from_nanos(nanos)),
            None => Ok(Timestamp::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = MergeConfig::default();
        assert_eq!(c.default_timestamp, None);
        assert!(c.verify_order);
    }

    #[test]
    fn parse_toml() {
        let c = MergeConfig::from_toml_str("default_timestamp = 1234\nverify_order = false\n").unwrap();
        assert_eq!(c.default_timestamp, Some(1234));
        assert!(!c.verify_order);
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        assert_eq!(MergeConfig::from_toml_str("").unwrap(), MergeConfig::default());
    }

    #[test]
    fn parse_invalid_toml() {
        let err = MergeConfig::from_toml_str("verify_order = \"yes\"").unwrap_err();
        assert!(matches!(err, MergeError::Config(_)));
    }

    #[test]
    fn resolve_fixed_timestamp() {
        let c = MergeConfig::with_default_timestamp(Timestamp::from_nanos(77));
        assert_eq!(c.resolve_default_timestamp().unwrap(), Timestamp::from_nanos(77));
    }

    #[test]
    fn resolve_zero_is_rejected() {
        let c = MergeConfig {
            default_timestamp: Some(0),
            ..Default::default()
        };
        assert!(matches!(c.resolve_default_timestamp(), Err(MergeError::Config(_))));
    }

    #[test]
    fn resolve_wall_clock() {
        let ts = MergeConfig::default().resolve_default_timestamp().unwrap();
        assert!(!ts.is_zero());
    }
}
