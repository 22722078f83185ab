//! Typed configuration for a plugin session
//!
//! Mirrors the create-time parameter set the host hands over: device
//! identity and secret for the protocol client, plus refresh, batching and
//! filtering knobs for this layer. Durations are human-readable in
//! serialized form ("300s", "5m").

use crate::filters::FilterConfig;
use crate::state::Offsets;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity and calibration of one physical unit.
///
/// `id`, `address` and `local_key` are consumed by the protocol client; the
/// offsets by the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Vendor device identifier.
    pub id: String,
    /// LAN IP address.
    pub address: String,
    /// Per-device secret for the encrypted session.
    pub local_key: String,
    /// Added to decoded set points, removed before encoding them.
    #[serde(default)]
    pub set_point_offset: f64,
    /// Added to decoded room temperatures.
    #[serde(default)]
    pub temp_offset: f64,
}

impl DeviceConfig {
    /// Calibration offsets for the codec.
    pub fn offsets(&self) -> Offsets {
        Offsets {
            set_point: self.set_point_offset,
            temp: self.temp_offset,
        }
    }
}

/// Full session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Display name, prefixed to every widget name.
    pub name: String,
    pub device: DeviceConfig,
    /// Minimum time between device refreshes.
    #[serde(default = "default_refresh_interval", with = "humantime_serde")]
    pub refresh_interval: Duration,
    /// When set, rapid inbound commands within this window are batched into
    /// a single device write.
    #[serde(default, with = "humantime_serde::option")]
    pub debounce_commands: Option<Duration>,
    /// Preprocessing for the room-temperature sensor.
    #[serde(default)]
    pub temp_filters: FilterConfig,
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(300)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_config_defaults() {
        let config: PluginConfig = serde_json::from_str(
            r#"{
                "name": "Living room AC",
                "device": {"id": "bf1234", "address": "192.168.1.40", "local_key": "secret"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.debounce_commands, None);
        assert_eq!(config.temp_filters, FilterConfig::default());
        assert_eq!(config.device.offsets(), Offsets::default());
    }

    #[test]
    fn test_full_config_round_trip() {
        let config: PluginConfig = serde_json::from_str(
            r#"{
                "name": "Bedroom AC",
                "device": {
                    "id": "bf9876",
                    "address": "192.168.1.41",
                    "local_key": "secret",
                    "set_point_offset": -1.0,
                    "temp_offset": -2.0
                },
                "refresh_interval": "2m",
                "debounce_commands": "1s",
                "temp_filters": {"moving_average": 5, "debounce": "30s"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.refresh_interval, Duration::from_secs(120));
        assert_eq!(config.debounce_commands, Some(Duration::from_secs(1)));
        assert_eq!(config.temp_filters.moving_average, Some(5));
        assert_eq!(config.device.offsets().set_point, -1.0);

        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: PluginConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }
}
