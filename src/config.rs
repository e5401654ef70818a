use std::path::Path;

use serde::Deserialize;

use crate::error::CdsError;

pub const DEFAULT_PRECISION: usize = 3;

/// Settings for one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Decimal digits used when comparing areas and fractions.
    pub precision: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ValidationConfig {
    pub fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CdsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CdsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = ValidationConfig::from_json_str("{}").unwrap();
        assert_eq!(config.precision, DEFAULT_PRECISION);
    }

    #[test]
    fn reads_precision() {
        let config = ValidationConfig::from_json_str(r#"{"precision": 2}"#).unwrap();
        assert_eq!(config, ValidationConfig::with_precision(2));
    }

    #[test]
    fn bad_json_is_an_error() {
        let err = ValidationConfig::from_json_str(r#"{"precision": "two"}"#).unwrap_err();
        assert!(matches!(err, CdsError::Json(_)));
    }
}
