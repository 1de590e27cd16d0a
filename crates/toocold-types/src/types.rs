//! Core types for room-climate data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::{ParseError, ParseResult};

/// One indoor temperature/humidity sample.
///
/// A series of readings is always stored oldest-first with the latest reading
/// last. Readings are never modified after they are received.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// When the sample was taken.
    #[cfg_attr(feature = "serde", serde(with = "feed_timestamp"))]
    pub timestamp: OffsetDateTime,
    /// Temperature in degrees Celsius.
    pub temp: f64,
    /// Relative humidity percentage.
    pub hum: f64,
    /// Sensor battery level in percent, if the sensor reports one.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub battery: Option<f64>,
}

impl Reading {
    /// Create a reading without battery information.
    #[must_use]
    pub fn new(timestamp: OffsetDateTime, temp: f64, hum: f64) -> Self {
        Self {
            timestamp,
            temp,
            hum,
            battery: None,
        }
    }

    /// Attach a battery level.
    #[must_use]
    pub fn with_battery(mut self, battery: f64) -> Self {
        self.battery = Some(battery);
        self
    }
}

/// Parse a feed timestamp.
///
/// Accepts RFC 3339 (`2025-01-31T11:00:00Z`, `2025-01-31T16:30:00+05:30`) and
/// the offset-less ISO 8601 form (`2025-01-31T11:00:00`, optionally with
/// fractional seconds), which is taken to be UTC.
///
/// ```
/// use time::macros::datetime;
/// use toocold_types::parse_timestamp;
///
/// let expected = datetime!(2025-01-31 11:00 UTC);
/// assert_eq!(parse_timestamp("2025-01-31T11:00:00Z").unwrap(), expected);
/// assert_eq!(parse_timestamp("2025-01-31T11:00:00").unwrap(), expected);
/// assert!(parse_timestamp("yesterday").is_err());
/// ```
pub fn parse_timestamp(raw: &str) -> ParseResult<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(at);
    }
    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .map(PrimitiveDateTime::assume_utc)
    .map_err(|_| ParseError::InvalidTimestamp(raw.to_string()))
}

/// Serialized as RFC 3339; deserialized with [`parse_timestamp`].
#[cfg(feature = "serde")]
mod feed_timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(at: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(at, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Health indicator for a single data source.
///
/// `Demo` means the source is deliberately not configured and synthetic data
/// is being served in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum SourceStatus {
    /// The last fetch succeeded.
    Ok,
    /// The last fetch failed.
    #[default]
    Error,
    /// No real source is configured.
    Demo,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Ok => write!(f, "OK"),
            SourceStatus::Error => write!(f, "ERROR"),
            SourceStatus::Demo => write!(f, "DEMO"),
        }
    }
}

/// Time window selector for filtered views and comparison buckets.
///
/// ```
/// use toocold_types::TimeRange;
///
/// let range: TimeRange = "24h".parse().unwrap();
/// assert_eq!(range, TimeRange::Day);
/// assert_eq!(range.duration().whole_seconds(), 86_400);
/// assert_eq!(range.to_string(), "24h");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeRange {
    /// Last hour.
    #[cfg_attr(feature = "serde", serde(rename = "1h"))]
    OneHour,
    /// Last three hours.
    #[cfg_attr(feature = "serde", serde(rename = "3h"))]
    ThreeHours,
    /// Last six hours.
    #[cfg_attr(feature = "serde", serde(rename = "6h"))]
    SixHours,
    /// Last twelve hours.
    #[cfg_attr(feature = "serde", serde(rename = "12h"))]
    TwelveHours,
    /// Last 24 hours.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "24h"))]
    Day,
    /// Last seven days.
    #[cfg_attr(feature = "serde", serde(rename = "1w"))]
    Week,
}

impl TimeRange {
    /// All selectors, shortest first.
    pub const ALL: [TimeRange; 6] = [
        TimeRange::OneHour,
        TimeRange::ThreeHours,
        TimeRange::SixHours,
        TimeRange::TwelveHours,
        TimeRange::Day,
        TimeRange::Week,
    ];

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match self {
            TimeRange::OneHour => Duration::seconds(3_600),
            TimeRange::ThreeHours => Duration::seconds(10_800),
            TimeRange::SixHours => Duration::seconds(21_600),
            TimeRange::TwelveHours => Duration::seconds(43_200),
            TimeRange::Day => Duration::seconds(86_400),
            TimeRange::Week => Duration::seconds(604_800),
        }
    }

    /// The short selector label, e.g. `"6h"`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::ThreeHours => "3h",
            TimeRange::SixHours => "6h",
            TimeRange::TwelveHours => "12h",
            TimeRange::Day => "24h",
            TimeRange::Week => "1w",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TimeRange::ALL
            .into_iter()
            .find(|range| range.as_str() == needle)
            .ok_or_else(|| ParseError::UnknownTimeRange(s.to_string()))
    }
}

/// Geographic coordinates used for the outdoor sources.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            lat: 25.5941,
            lon: 85.1376,
        }
    }
}

/// Current outdoor conditions from the weather source.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentConditions {
    /// Air temperature at 2 m in degrees Celsius.
    #[cfg_attr(feature = "serde", serde(rename = "temperature_2m"))]
    pub temperature: f64,
    /// Relative humidity at 2 m in percent.
    #[cfg_attr(feature = "serde", serde(rename = "relative_humidity_2m"))]
    pub humidity: f64,
    /// WMO weather interpretation code.
    pub weather_code: u16,
}

/// Hourly outdoor series, indexed by ISO hour labels.
///
/// Labels are local wall-clock times (`2025-01-31T14:00`) in the timezone the
/// request asked for. Individual values may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HourlySeries {
    /// Hour labels.
    pub time: Vec<String>,
    /// Temperature per hour.
    #[cfg_attr(feature = "serde", serde(rename = "temperature_2m", default))]
    pub temperature: Vec<Option<f64>>,
    /// Relative humidity per hour.
    #[cfg_attr(feature = "serde", serde(rename = "relative_humidity_2m", default))]
    pub humidity: Vec<Option<f64>>,
}

/// Daily outdoor aggregates. Index 0 is the first requested day.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailySeries {
    /// Day labels (`2025-01-31`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub time: Vec<String>,
    /// Maximum UV index per day.
    #[cfg_attr(feature = "serde", serde(default))]
    pub uv_index_max: Vec<Option<f64>>,
    /// Maximum wind speed at 10 m per day, in km/h.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "wind_speed_10m_max", default)
    )]
    pub wind_speed_max: Vec<Option<f64>>,
}

/// One weather-source response. Replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutdoorSnapshot {
    /// Offset of the requested timezone from UTC, used to anchor hour labels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub utc_offset_seconds: i32,
    /// Current conditions.
    pub current: CurrentConditions,
    /// Hourly series, if the source returned one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hourly: Option<HourlySeries>,
    /// Daily aggregates, if the source returned them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub daily: Option<DailySeries>,
}

impl OutdoorSnapshot {
    /// The timezone offset the hourly labels are expressed in.
    ///
    /// Out-of-range offsets fall back to UTC.
    #[must_use]
    pub fn offset(&self) -> UtcOffset {
        UtcOffset::from_whole_seconds(self.utc_offset_seconds).unwrap_or(UtcOffset::UTC)
    }

    /// Today's maximum UV index.
    #[must_use]
    pub fn uv_index_today(&self) -> Option<f64> {
        self.daily
            .as_ref()
            .and_then(|d| d.uv_index_max.first().copied().flatten())
    }

    /// Today's maximum wind speed in km/h.
    #[must_use]
    pub fn wind_speed_today(&self) -> Option<f64> {
        self.daily
            .as_ref()
            .and_then(|d| d.wind_speed_max.first().copied().flatten())
    }

    /// Interpreted current weather condition.
    #[must_use]
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_code(self.current.weather_code)
    }
}

/// Current air quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirQualitySnapshot {
    /// US EPA air quality index.
    pub us_aqi: u32,
}

/// Coarse weather condition derived from a WMO weather code.
///
/// ```
/// use toocold_types::WeatherCondition;
///
/// assert_eq!(WeatherCondition::from_code(0).label(), "CLEAR");
/// assert_eq!(WeatherCondition::from_code(63).icon(), "cloud-rain");
/// assert_eq!(WeatherCondition::from_code(71).label(), "--");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum WeatherCondition {
    /// Code 0.
    Clear,
    /// Code 1, mainly clear.
    Fair,
    /// Code 2, partly cloudy.
    Cloudy,
    /// Code 3.
    Overcast,
    /// Code 45.
    Fog,
    /// Codes 61 and 63.
    Rain,
    /// Code 80, rain showers.
    Showers,
    /// Code 95.
    Storm,
    /// Any other code.
    Unknown,
}

impl WeatherCondition {
    /// Map a WMO weather code to a condition.
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1 => WeatherCondition::Fair,
            2 => WeatherCondition::Cloudy,
            3 => WeatherCondition::Overcast,
            45 => WeatherCondition::Fog,
            61 | 63 => WeatherCondition::Rain,
            80 => WeatherCondition::Showers,
            95 => WeatherCondition::Storm,
            _ => WeatherCondition::Unknown,
        }
    }

    /// Short uppercase label. Conditions without a label render as `--`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "CLEAR",
            WeatherCondition::Fair => "FAIR",
            WeatherCondition::Cloudy => "CLOUDY",
            WeatherCondition::Overcast => "OVERCAST",
            WeatherCondition::Fog => "FOG",
            WeatherCondition::Rain => "RAIN",
            WeatherCondition::Storm => "STORM",
            WeatherCondition::Showers | WeatherCondition::Unknown => "--",
        }
    }

    /// Icon name (Lucide icon set) for the condition.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "sun",
            WeatherCondition::Fair => "cloud-sun",
            WeatherCondition::Cloudy => "cloud",
            WeatherCondition::Overcast => "cloudy",
            WeatherCondition::Fog => "cloud-fog",
            WeatherCondition::Rain => "cloud-rain",
            WeatherCondition::Showers => "cloud-drizzle",
            WeatherCondition::Storm => "cloud-lightning",
            WeatherCondition::Unknown => "cloud",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
