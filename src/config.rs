//! Calculator settings.
//!
//! [`CalculatorConfig`] is a plain struct, built in code or deserialized by
//! the host from whatever storage it uses.
//!
//! ```
//! use scicalc::{AngleMode, CalculatorConfig, Matching};
//!
//! let config = CalculatorConfig::from_json(r#"{ "angle_mode": "radians" }"#).unwrap();
//! assert_eq!(config.angle_mode, AngleMode::Radians);
//! assert_eq!(config.precision, 8);
//! assert_eq!(config.matching, Matching::Substring);
//! ```

use crate::format::DEFAULT_PRECISION;
use crate::formula::Matching;
use crate::normalize::AngleMode;
use serde::{Deserialize, Serialize};

/// Settings of a [`Calculator`](crate::Calculator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Angle mode at start-up
    pub angle_mode: AngleMode,
    /// Decimal places kept in displayed results
    pub precision: usize,
    /// How formula variable names are matched in templates
    pub matching: Matching,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Degrees,
            precision: DEFAULT_PRECISION,
            matching: Matching::Substring,
        }
    }
}

impl CalculatorConfig {
    /// Read a config from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.angle_mode, AngleMode::Degrees);
        assert_eq!(config.precision, 8);
        assert_eq!(CalculatorConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn overrides() {
        let config =
            CalculatorConfig::from_json(r#"{"precision": 4, "matching": "identifier"}"#).unwrap();
        assert_eq!(config.precision, 4);
        assert_eq!(config.matching, Matching::Identifier);
        assert_eq!(config.angle_mode, AngleMode::Degrees);

        assert!(CalculatorConfig::from_json(r#"{"angle_mode": "grads"}"#).is_err());
    }
}
