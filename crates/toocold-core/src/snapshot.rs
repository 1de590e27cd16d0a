//! The immutable result of one refresh cycle.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use toocold_types::{AirQualitySnapshot, OutdoorSnapshot, Reading, SourceStatus, TimeRange};

use crate::timeseries::filter_range;

/// Status indicator per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceStatuses {
    /// Indoor feed.
    pub indoor: SourceStatus,
    /// Weather API.
    pub weather: SourceStatus,
    /// Air-quality API.
    pub air_quality: SourceStatus,
}

/// Everything one refresh produced.
///
/// A snapshot is never modified after it is published. The indoor series is
/// oldest first and never empty; outdoor and air-quality data may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Indoor readings, oldest first.
    pub indoor: Vec<Reading>,
    /// Outdoor weather, if the weather source succeeded.
    pub outdoor: Option<OutdoorSnapshot>,
    /// Air quality, if the air-quality source succeeded.
    pub air_quality: Option<AirQualitySnapshot>,
    /// When the refresh ran.
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    /// Number of source calls made during the refresh.
    pub source_call_count: u32,
    /// Per-source status indicators.
    pub statuses: SourceStatuses,
    /// Display offset to use when `outdoor` is absent: the offset reported by
    /// the most recent successful weather fetch, or 0 before there was one.
    #[serde(default)]
    pub last_known_offset_seconds: i32,
}

impl Snapshot {
    /// The most recent indoor reading.
    pub fn latest(&self) -> Option<&Reading> {
        self.indoor.last()
    }

    /// Whether the indoor series is synthetic demo data.
    pub fn is_demo(&self) -> bool {
        self.statuses.indoor == SourceStatus::Demo
    }

    /// Indoor readings inside `range`, measured back from `now`.
    pub fn filtered(&self, range: TimeRange, now: OffsetDateTime) -> Vec<Reading> {
        filter_range(&self.indoor, range, now)
    }

    /// Offset used to display local times.
    ///
    /// The weather source reports the configured timezone's offset. Without
    /// weather data in this snapshot the last offset it reported is used, so
    /// labels stay put when the weather API drops out for a cycle.
    pub fn display_offset(&self) -> UtcOffset {
        match &self.outdoor {
            Some(outdoor) => outdoor.offset(),
            None => UtcOffset::from_whole_seconds(self.last_known_offset_seconds)
                .unwrap_or(UtcOffset::UTC),
        }
    }

    /// Current US AQI, if known.
    pub fn aqi(&self) -> Option<u32> {
        self.air_quality.map(|a| a.us_aqi)
    }
}
