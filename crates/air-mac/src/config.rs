//! Interface configuration
//!
//! Resolved exactly once, when the interface is constructed. Every value
//! that can be wrong (unknown profile, unlisted bitrate, malformed address,
//! inverted time bounds) fails construction; nothing is re-validated on the
//! send path.

use std::time::Duration;

use air_protocol::ConfigError;
use serde::{Deserialize, Serialize};

/// Bitrate overrides for the three fixed frame-class modes
///
/// `None` derives the mode from the catalog: control frames fall back to the
/// slowest mandatory rate, multicast to the fastest mandatory rate, and data
/// to the fastest rate overall. A configured bitrate must exist in the
/// catalog exactly, or construction fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOverrides {
    /// Bitrate for control frames, in bits per second
    pub control_bitrate: Option<u64>,
    /// Bitrate for multicast data/management frames, in bits per second
    pub multicast_bitrate: Option<u64>,
    /// Bitrate for unicast data/management frames, in bits per second
    pub data_bitrate: Option<u64>,
}

/// Configuration for a link-layer interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Name of the mode-catalog profile to resolve
    pub mode_set: String,
    /// Fixed-rate overrides
    #[serde(default)]
    pub rates: RateOverrides,
    /// MAC address, or the literal `"auto"` to generate one
    pub address: String,
    /// Earliest time the interface may carry traffic
    #[serde(default)]
    pub start_at: Option<Duration>,
    /// Latest time the interface may carry traffic
    #[serde(default)]
    pub stop_at: Option<Duration>,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            mode_set: "802.11g".to_string(),
            rates: RateOverrides::default(),
            address: "auto".to_string(),
            start_at: None,
            stop_at: None,
        }
    }
}

impl InterfaceConfig {
    /// Check the time bounds for consistency
    pub fn validate_time_bounds(&self) -> Result<(), ConfigError> {
        if let (Some(start), Some(stop)) = (self.start_at, self.stop_at) {
            if stop < start {
                return Err(ConfigError::InvalidTimeBounds {
                    start_ms: start.as_millis() as u64,
                    stop_ms: stop.as_millis() as u64,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = InterfaceConfig::default();
        assert_eq!(config.mode_set, "802.11g");
        assert_eq!(config.address, "auto");
        assert!(config.validate_time_bounds().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = InterfaceConfig {
            start_at: Some(Duration::from_secs(10)),
            stop_at: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        assert!(matches!(
            config.validate_time_bounds(),
            Err(ConfigError::InvalidTimeBounds { .. })
        ));
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: InterfaceConfig = serde_json::from_str(
            r#"{
                "mode_set": "802.11b",
                "address": "auto",
                "rates": { "data_bitrate": 11000000 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.rates.data_bitrate, Some(11_000_000));
        assert_eq!(config.rates.control_bitrate, None);
        assert!(config.start_at.is_none());
    }
}
