//! Validator configuration

use crate::ValidatorError;
use serde::{Deserialize, Serialize};

/// Configuration for validation rules
///
/// Loaded from the `[validation]` section of the config file:
///
/// ```toml
/// [validation]
/// max_name_length = 200
/// reject_future_dates = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum length of a person's name, in characters
    pub max_name_length: usize,

    /// Reject met-dates after today
    pub reject_future_dates: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_length: 200,
            reject_future_dates: true,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (minimal validation)
    ///
    /// Relational checks (self-friendship, duplicates, introducers) always
    /// run; only the tunable rules are relaxed.
    pub fn permissive() -> Self {
        Self {
            max_name_length: 1000,
            reject_future_dates: false,
        }
    }

    /// Check that the configuration is usable
    pub fn check(&self) -> Result<(), ValidatorError> {
        if self.max_name_length == 0 {
            return Err(ValidatorError::Config(
                "max_name_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
