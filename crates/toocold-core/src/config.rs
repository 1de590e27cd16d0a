//! Dashboard configuration.
//!
//! [`DashboardConfig`] carries everything a refresh cycle needs: the indoor feed
//! endpoint, the coordinates for the outdoor sources, the refresh cadence and
//! the display name. The defaults reproduce demo mode, so an absent or partial
//! configuration still yields a working dashboard.
//!
//! # Example
//!
//! ```
//! use toocold_core::DashboardConfig;
//!
//! let config = DashboardConfig::default();
//! assert!(config.is_demo());
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use toocold_types::Coordinates;

use crate::error::{Error, Result};
use crate::sources::indoor::is_demo_url;

/// Sentinel indoor URL meaning "no real source configured".
pub const DEMO_INDOOR_URL: &str = "MOCK_DATA";
/// Default weather endpoint.
pub const DEFAULT_WEATHER_API: &str = "https://api.open-meteo.com/v1/forecast";
/// Default air-quality endpoint.
pub const DEFAULT_AIR_QUALITY_API: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
/// Default timezone requested from the outdoor sources.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
/// Default display name.
pub const DEFAULT_LOCATION_NAME: &str = "My Room";

/// Minimum refresh interval in seconds (10 seconds).
pub const MIN_REFRESH_INTERVAL: u64 = 10;
/// Maximum refresh interval in seconds (1 hour).
pub const MAX_REFRESH_INTERVAL: u64 = 3600;

/// Configuration for one dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Indoor feed endpoint, or [`DEMO_INDOOR_URL`].
    pub indoor_url: String,
    /// Location for the outdoor sources.
    pub coords: Coordinates,
    /// Seconds between refresh cycles.
    pub refresh_interval_secs: u64,
    /// Display name of the monitored room.
    pub location_name: String,
    /// Timezone the outdoor sources report hourly labels in.
    pub timezone: String,
    /// Weather endpoint.
    pub weather_api: String,
    /// Air-quality endpoint.
    pub air_quality_api: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            indoor_url: DEMO_INDOOR_URL.to_string(),
            coords: Coordinates::default(),
            refresh_interval_secs: 60,
            location_name: DEFAULT_LOCATION_NAME.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            weather_api: DEFAULT_WEATHER_API.to_string(),
            air_quality_api: DEFAULT_AIR_QUALITY_API.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl DashboardConfig {
    /// Whether the indoor source is in demo mode.
    pub fn is_demo(&self) -> bool {
        is_demo_url(&self.indoor_url)
    }

    /// Time between refresh cycles.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration and return all errors found.
    ///
    /// The indoor URL is not checked here: anything that is not a usable
    /// endpoint selects demo mode at fetch time.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !(-90.0..=90.0).contains(&self.coords.lat) {
            errors.push(ValidationError {
                field: "coords.lat".to_string(),
                message: format!(
                    "latitude {} is out of range (must be -90 to 90)",
                    self.coords.lat
                ),
            });
        }

        if !(-180.0..=180.0).contains(&self.coords.lon) {
            errors.push(ValidationError {
                field: "coords.lon".to_string(),
                message: format!(
                    "longitude {} is out of range (must be -180 to 180)",
                    self.coords.lon
                ),
            });
        }

        if self.refresh_interval_secs < MIN_REFRESH_INTERVAL {
            errors.push(ValidationError {
                field: "refresh_interval_secs".to_string(),
                message: format!(
                    "refresh interval {} is too short (minimum {} seconds)",
                    self.refresh_interval_secs, MIN_REFRESH_INTERVAL
                ),
            });
        } else if self.refresh_interval_secs > MAX_REFRESH_INTERVAL {
            errors.push(ValidationError {
                field: "refresh_interval_secs".to_string(),
                message: format!(
                    "refresh interval {} is too long (maximum {} seconds)",
                    self.refresh_interval_secs, MAX_REFRESH_INTERVAL
                ),
            });
        }

        if self.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "request_timeout_secs".to_string(),
                message: "request timeout cannot be 0".to_string(),
            });
        }

        if self.timezone.trim().is_empty() {
            errors.push(ValidationError {
                field: "timezone".to_string(),
                message: "timezone cannot be empty".to_string(),
            });
        }

        for (field, url) in [
            ("weather_api", &self.weather_api),
            ("air_quality_api", &self.air_quality_api),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: format!("URL must start with http:// or https://, got: {}", url),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidConfig(errors))
        }
    }
}

/// A single validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path (e.g., `coords.lat`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: Error) -> Vec<String> {
        match err {
            Error::InvalidConfig(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_config_default() {
        let config = DashboardConfig::default();
        assert_eq!(config.indoor_url, "MOCK_DATA");
        assert_eq!(config.coords, Coordinates { lat: 25.5941, lon: 85.1376 });
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.location_name, "My Room");
        assert_eq!(config.timezone, "Asia/Kolkata");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.is_demo());
    }

    #[test]
    fn test_config_partial_deserialize_uses_defaults() {
        let json = r#"{"indoor_url": "https://feed.example.com/readings", "location_name": "Study"}"#;
        let config: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.location_name, "Study");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.weather_api, DEFAULT_WEATHER_API);
        assert!(!config.is_demo());
    }

    #[test]
    fn test_placeholder_url_is_demo() {
        let config = DashboardConfig {
            indoor_url: "https://YOUR_SCRIPT_ID.example.com/exec".to_string(),
            ..Default::default()
        };
        assert!(config.is_demo());
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_coordinates() {
        let config = DashboardConfig {
            coords: Coordinates { lat: 91.0, lon: -181.0 },
            ..Default::default()
        };
        let fields = fields(config.validate().unwrap_err());
        assert_eq!(fields, vec!["coords.lat", "coords.lon"]);
    }

    #[test]
    fn test_validate_refresh_interval_bounds() {
        let too_short = DashboardConfig {
            refresh_interval_secs: 5,
            ..Default::default()
        };
        assert_eq!(fields(too_short.validate().unwrap_err()), vec!["refresh_interval_secs"]);

        let too_long = DashboardConfig {
            refresh_interval_secs: 7200,
            ..Default::default()
        };
        assert_eq!(fields(too_long.validate().unwrap_err()), vec!["refresh_interval_secs"]);

        let boundary = DashboardConfig {
            refresh_interval_secs: MIN_REFRESH_INTERVAL,
            ..Default::default()
        };
        assert!(boundary.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = DashboardConfig {
            timezone: "  ".to_string(),
            weather_api: "api.open-meteo.com".to_string(),
            air_quality_api: "ftp://example.com".to_string(),
            request_timeout_secs: 0,
            ..Default::default()
        };
        let fields = fields(config.validate().unwrap_err());
        assert_eq!(
            fields,
            vec!["request_timeout_secs", "timezone", "weather_api", "air_quality_api"]
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError {
            field: "timezone".to_string(),
            message: "timezone cannot be empty".to_string(),
        };
        assert_eq!(err.to_string(), "timezone: timezone cannot be empty");
    }
}
