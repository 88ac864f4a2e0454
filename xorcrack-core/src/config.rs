// File:    config.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Search configuration with defaults, validation and JSON persistence.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::completer::{CompletionPolicy, DEFAULT_MAX_UNKNOWN};
use crate::error::ConfigError;
use crate::pattern::FlagPattern;
use crate::validator::{DEFAULT_MIN_PRINTABLE_RATIO, Validator};

/// Default upper bound of the key length search.
pub const DEFAULT_MAX_KEY_LEN: usize = 40;

/// Tunables for a crib search. Missing fields take their default value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Smallest key length to try.
    pub min_key_len: usize,
    /// Largest key length to try.
    pub max_key_len: usize,
    /// Most unknown key slots a hypothesis may leave for brute force.
    pub max_unknown: usize,
    /// The flag an accepted plaintext must contain.
    pub pattern: FlagPattern,
    /// Minimum share of printable ASCII bytes in an accepted plaintext.
    pub min_printable_ratio: f64,
    /// How to choose among several valid completions of one hypothesis.
    pub policy: CompletionPolicy,
    /// Key lengths used to build diagnostics when nothing is accepted.
    pub diagnostic_key_lengths: Vec<usize>,
    /// Number of diagnostics to report.
    pub diagnostic_count: usize,
    /// Number of plaintext bytes shown in each diagnostic preview.
    pub preview_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_key_len: 1,
            max_key_len: DEFAULT_MAX_KEY_LEN,
            max_unknown: DEFAULT_MAX_UNKNOWN,
            pattern: FlagPattern::default(),
            min_printable_ratio: DEFAULT_MIN_PRINTABLE_RATIO,
            policy: CompletionPolicy::default(),
            diagnostic_key_lengths: vec![8],
            diagnostic_count: 5,
            preview_len: 64,
        }
    }
}

impl SearchConfig {
    /// Checks that the configuration describes a searchable space.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_key_len == 0 {
            return Err(ConfigError::Invalid(
                "min_key_len must be at least 1".to_string(),
            ));
        }
        if self.max_key_len < self.min_key_len {
            return Err(ConfigError::Invalid(format!(
                "max_key_len ({}) is smaller than min_key_len ({})",
                self.max_key_len, self.min_key_len
            )));
        }
        if !(0.0..=1.0).contains(&self.min_printable_ratio) {
            return Err(ConfigError::Invalid(format!(
                "min_printable_ratio must lie in [0, 1], got {}",
                self.min_printable_ratio
            )));
        }
        if self.diagnostic_key_lengths.is_empty() || self.diagnostic_key_lengths.contains(&0) {
            return Err(ConfigError::Invalid(
                "diagnostic_key_lengths must list key lengths of at least 1".to_string(),
            ));
        }
        if self.diagnostic_count == 0 {
            return Err(ConfigError::Invalid(
                "diagnostic_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the candidate validator this configuration describes.
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator::new(self.pattern.clone(), self.min_printable_ratio)
    }
}

/// Loads a configuration from a JSON file and validates it.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or holds
/// invalid values.
pub fn load_config(path: &Path) -> Result<SearchConfig, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    let config: SearchConfig = serde_json::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

/// Saves a configuration to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn save_config(path: &Path, config: &SearchConfig) -> Result<(), ConfigError> {
    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(path, config_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::BodyClass;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_key_len, 40);
        assert_eq!(config.max_unknown, 3);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = SearchConfig {
            min_key_len: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.min_key_len = 10;
        config.max_key_len = 5;
        assert!(config.validate().is_err());
        config.max_key_len = 10;
        config.min_printable_ratio = 1.5;
        assert!(config.validate().is_err());
        config.min_printable_ratio = 0.9;
        config.diagnostic_key_lengths = vec![0];
        assert!(config.validate().is_err());
        config.diagnostic_key_lengths = Vec::new();
        assert!(config.validate().is_err());
        config.diagnostic_key_lengths = vec![8];
        config.diagnostic_count = 0;
        assert!(config.validate().is_err());
        config.diagnostic_count = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{"max_key_len": 12, "pattern": {"prefix": "flag", "body": "word"}}"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_key_len, 12);
        assert_eq!(config.pattern, FlagPattern::new("flag", BodyClass::Word));
        assert_eq!(config.max_unknown, 3);
        assert_eq!(config.policy, CompletionPolicy::First);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search.json");
        let config = SearchConfig {
            max_unknown: 2,
            policy: CompletionPolicy::Ranked,
            ..SearchConfig::default()
        };
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn load_reports_invalid_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
        fs::write(&path, r#"{"min_key_len": 0}"#).unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    }
}
