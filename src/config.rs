use serde::{Deserialize, Serialize};

use crate::runtime::error::RenError;

/// Interpreter settings.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes: `{"max_depth": 64}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log every evaluation step at TRACE level.
    pub trace: bool,
    /// Maximum number of action frames live at once.
    pub max_depth: usize,
    /// Context allocations between automatic recycles.
    pub recycle_threshold: usize,
    pub gc_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace: false,
            max_depth: 1000,
            recycle_threshold: 10_000,
            gc_enabled: true,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, RenError> {
        serde_json::from_str(text).map_err(|err| RenError::Config(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, RenError> {
        serde_json::to_string_pretty(self).map_err(|err| RenError::Config(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = Config::from_json(r#"{"max_depth": 12}"#).unwrap();
        assert_eq!(config.max_depth, 12);
        assert!(config.gc_enabled);
        assert_eq!(config.recycle_threshold, 10_000);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = Config::from_json("{max_depth").unwrap_err();
        assert_eq!(err.id(), "config");
    }

    #[test]
    fn survives_a_json_trip() {
        let config = Config {
            trace: true,
            ..Config::default()
        };
        let text = config.to_json().unwrap();
        assert_eq!(Config::from_json(&text).unwrap(), config);
    }
}
