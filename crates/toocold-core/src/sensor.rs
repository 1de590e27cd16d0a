//! Indoor sensor health and power source.

use core::fmt;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use toocold_types::Reading;

/// Readings younger than this are considered live.
pub const ONLINE_THRESHOLD: Duration = Duration::minutes(5);
/// Readings younger than this (but not live) are considered late.
pub const DELAYED_THRESHOLD: Duration = Duration::minutes(15);

/// Connection state of the indoor sensor, judged by the age of its latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorHealth {
    /// The indoor source is in demo mode.
    Demo,
    /// Latest reading under 5 minutes old.
    Online,
    /// Latest reading under 15 minutes old.
    Delayed,
    /// Anything older.
    Offline,
}

impl SensorHealth {
    /// Judge sensor health from the latest reading.
    ///
    /// Demo mode always reports [`SensorHealth::Demo`].
    pub fn evaluate(latest: &Reading, demo: bool, now: OffsetDateTime) -> Self {
        if demo {
            return SensorHealth::Demo;
        }
        let age = now - latest.timestamp;
        if age < ONLINE_THRESHOLD {
            SensorHealth::Online
        } else if age < DELAYED_THRESHOLD {
            SensorHealth::Delayed
        } else {
            SensorHealth::Offline
        }
    }
}

impl fmt::Display for SensorHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorHealth::Demo => write!(f, "DEMO"),
            SensorHealth::Online => write!(f, "ONLINE"),
            SensorHealth::Delayed => write!(f, "DELAYED"),
            SensorHealth::Offline => write!(f, "OFFLINE"),
        }
    }
}

/// How the sensor is powered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "percent", rename_all = "lowercase")]
pub enum PowerSource {
    /// Battery with its charge in percent.
    Battery(f64),
    /// No battery level reported.
    Usb,
}

impl PowerSource {
    /// A zero or missing battery level means the sensor runs on USB power.
    pub fn from_reading(reading: &Reading) -> Self {
        match reading.battery {
            Some(level) if level != 0.0 && !level.is_nan() => PowerSource::Battery(level),
            _ => PowerSource::Usb,
        }
    }
}

impl fmt::Display for PowerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerSource::Battery(level) => write!(f, "{}%", level),
            PowerSource::Usb => write!(f, "USB"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-01-31 12:00 UTC);

    fn aged(minutes: i64) -> Reading {
        Reading::new(NOW - Duration::minutes(minutes), 21.0, 50.0)
    }

    #[test]
    fn test_health_thresholds() {
        assert_eq!(SensorHealth::evaluate(&aged(0), false, NOW), SensorHealth::Online);
        assert_eq!(SensorHealth::evaluate(&aged(4), false, NOW), SensorHealth::Online);
        assert_eq!(SensorHealth::evaluate(&aged(5), false, NOW), SensorHealth::Delayed);
        assert_eq!(SensorHealth::evaluate(&aged(14), false, NOW), SensorHealth::Delayed);
        assert_eq!(SensorHealth::evaluate(&aged(15), false, NOW), SensorHealth::Offline);
        assert_eq!(SensorHealth::evaluate(&aged(600), false, NOW), SensorHealth::Offline);
    }

    #[test]
    fn test_health_demo_overrides_age() {
        assert_eq!(SensorHealth::evaluate(&aged(600), true, NOW), SensorHealth::Demo);
    }

    #[test]
    fn test_health_display() {
        assert_eq!(SensorHealth::Delayed.to_string(), "DELAYED");
        assert_eq!(SensorHealth::Demo.to_string(), "DEMO");
    }

    #[test]
    fn test_power_source() {
        let reading = aged(0);
        assert_eq!(PowerSource::from_reading(&reading), PowerSource::Usb);
        assert_eq!(PowerSource::from_reading(&reading.with_battery(0.0)), PowerSource::Usb);
        assert_eq!(
            PowerSource::from_reading(&reading.with_battery(87.0)),
            PowerSource::Battery(87.0)
        );
        assert_eq!(PowerSource::Battery(87.0).to_string(), "87%");
        assert_eq!(PowerSource::Usb.to_string(), "USB");
    }

    #[test]
    fn test_power_source_serialization() {
        let json = serde_json::to_string(&PowerSource::Battery(55.0)).unwrap();
        assert_eq!(json, r#"{"kind":"battery","percent":55.0}"#);
        let json = serde_json::to_string(&PowerSource::Usb).unwrap();
        assert_eq!(json, r#"{"kind":"usb"}"#);
    }
}
