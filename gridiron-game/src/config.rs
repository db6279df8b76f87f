//! Career configuration supplied by the host.
use serde::{Deserialize, Serialize};

use crate::advantage::Side;

/// Inputs the host collects before a career starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CareerConfig {
    /// Free-text coach name; blank renders as "Coach".
    #[serde(default)]
    pub coach_name: String,
    /// Side granted whenever a queued gain has to pick one without asking.
    #[serde(default)]
    pub default_side: Side,
}

impl CareerConfig {
    #[must_use]
    pub fn new(coach_name: impl Into<String>, default_side: Side) -> Self {
        Self {
            coach_name: coach_name.into(),
            default_side,
        }
    }

    /// Parse a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = CareerConfig::from_json(r#"{ "coach_name": "Taylor" }"#).unwrap();
        assert_eq!(cfg.coach_name, "Taylor");
        assert_eq!(cfg.default_side, Side::Offense);

        let cfg = CareerConfig::from_json(r#"{ "default_side": "defense" }"#).unwrap();
        assert_eq!(cfg, CareerConfig::new("", Side::Defense));
    }

    #[test]
    fn bad_side_is_rejected() {
        assert!(CareerConfig::from_json(r#"{ "default_side": "special_teams" }"#).is_err());
    }
}
