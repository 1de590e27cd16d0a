//! Presentation-ready view of a snapshot.
//!
//! [`DashboardView::build`] is a pure function of a [`Snapshot`], a
//! [`TimeRange`], the current instant and a display offset. It bundles every
//! computed output a renderer needs into one serializable value.
//!
//! The "current" sections (hero, comfort, derived metrics, sensor) always use
//! the latest indoor reading regardless of the selected range. Stats and the
//! trend series use the filtered window; the comparison buckets sample the
//! whole series.

use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use toocold_types::{Reading, TimeRange};

use crate::buckets::{Comparison, build_comparison};
use crate::derived::{ComfortScore, DerivedMetrics};
use crate::error::{Error, Result};
use crate::sensor::{PowerSource, SensorHealth};
use crate::snapshot::{Snapshot, SourceStatuses};
use crate::stats::{StatsSummary, compute_stats};
use crate::timeseries::round1;

/// Latest inside vs current outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hero {
    /// Latest indoor temperature.
    pub indoor_temp: f64,
    /// Latest indoor humidity.
    pub indoor_hum: f64,
    /// Current outdoor temperature.
    pub outdoor_temp: Option<f64>,
    /// Current outdoor humidity.
    pub outdoor_hum: Option<f64>,
    /// Indoor minus outdoor temperature.
    pub temp_diff: Option<f64>,
    /// Indoor minus outdoor humidity.
    pub hum_diff: Option<f64>,
}

impl Hero {
    fn build(latest: &Reading, snapshot: &Snapshot) -> Self {
        let current = snapshot.outdoor.as_ref().map(|o| o.current);
        let outdoor_temp = current.map(|c| c.temperature);
        let outdoor_hum = current.map(|c| c.humidity);
        Self {
            indoor_temp: latest.temp,
            indoor_hum: latest.hum,
            outdoor_temp,
            outdoor_hum,
            temp_diff: outdoor_temp.map(|t| latest.temp - t),
            hum_diff: outdoor_hum.map(|h| latest.hum - h),
        }
    }
}

/// Indoor sensor state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorStatus {
    /// Connection health.
    pub health: SensorHealth,
    /// Power source.
    pub power: PowerSource,
    /// Timestamp of the latest reading.
    #[serde(with = "time::serde::rfc3339")]
    pub last_reading: OffsetDateTime,
}

/// Today's outdoor extras. Each field is absent when its source is.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OutdoorSummary {
    /// Today's maximum UV index.
    pub uv_index: Option<f64>,
    /// Today's maximum wind speed in km/h, rounded.
    pub wind_speed: Option<i64>,
    /// Current US AQI.
    pub aqi: Option<u32>,
    /// Condition label, e.g. `OVERCAST`.
    pub condition: Option<String>,
    /// Condition icon name.
    pub icon: Option<String>,
}

impl OutdoorSummary {
    fn build(snapshot: &Snapshot) -> Self {
        let outdoor = snapshot.outdoor.as_ref();
        let condition = outdoor.map(|o| o.condition());
        Self {
            uv_index: outdoor.and_then(|o| o.uv_index_today()),
            wind_speed: outdoor
                .and_then(|o| o.wind_speed_today())
                .map(|w| w.round() as i64),
            aqi: snapshot.aqi(),
            condition: condition.map(|c| c.label().to_string()),
            icon: condition.map(|c| c.icon().to_string()),
        }
    }
}

/// Indoor readings over the selected window, ready to plot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TrendSeries {
    /// One label per reading.
    pub labels: Vec<String>,
    /// Temperature per reading, one decimal.
    pub temp: Vec<f64>,
    /// Humidity per reading, as received.
    pub hum: Vec<f64>,
}

impl TrendSeries {
    /// Build the series for already filtered readings.
    ///
    /// The one-week range labels points `31 Jan 14:05`; shorter ranges use
    /// `14:05`. Times are rendered at `offset`.
    pub fn build(filtered: &[Reading], range: TimeRange, offset: UtcOffset) -> Self {
        let labels = filtered
            .iter()
            .map(|r| trend_label(r.timestamp.to_offset(offset), range))
            .collect();
        Self {
            labels,
            temp: filtered.iter().map(|r| round1(r.temp)).collect(),
            hum: filtered.iter().map(|r| r.hum).collect(),
        }
    }
}

fn trend_label(local: OffsetDateTime, range: TimeRange) -> String {
    let time = format!("{:02}:{:02}", local.hour(), local.minute());
    if range == TimeRange::Week {
        let month: String = local.month().to_string().chars().take(3).collect();
        format!("{} {} {}", local.day(), month, time)
    } else {
        time
    }
}

/// Everything the presentation layer renders for one snapshot and range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Selected range.
    pub range: TimeRange,
    /// When the snapshot was fetched.
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    /// Inside vs outside headline numbers.
    pub hero: Hero,
    /// Comfort score with breakdown.
    pub comfort: ComfortScore,
    /// Dew point and feels-like temperature.
    pub derived: DerivedMetrics,
    /// Indoor sensor state.
    pub sensor: SensorStatus,
    /// Outdoor extras.
    pub outdoor: OutdoorSummary,
    /// Window statistics; absent when the window holds no readings.
    pub stats: Option<StatsSummary>,
    /// Inside vs outside buckets.
    pub comparison: Comparison,
    /// Indoor trend over the window.
    pub trend: TrendSeries,
    /// Per-source status indicators.
    pub statuses: SourceStatuses,
    /// Source calls made by the refresh.
    pub source_call_count: u32,
}

impl DashboardView {
    /// Build the view for `range` as of `now`, rendering times at `offset`.
    ///
    /// Returns [`Error::EmptyDataSet`] only if the snapshot has no indoor
    /// readings at all, which a published snapshot never does.
    pub fn build(
        snapshot: &Snapshot,
        range: TimeRange,
        now: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<Self> {
        let latest = snapshot.latest().ok_or(Error::EmptyDataSet)?;
        let filtered = snapshot.filtered(range, now);

        let stats = match compute_stats(&filtered) {
            Ok(stats) => Some(stats),
            Err(Error::EmptyDataSet) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            range,
            fetched_at: snapshot.fetched_at,
            hero: Hero::build(latest, snapshot),
            comfort: ComfortScore::compute(latest.temp, latest.hum, snapshot.aqi()),
            derived: DerivedMetrics::compute(latest.temp, latest.hum),
            sensor: SensorStatus {
                health: SensorHealth::evaluate(latest, snapshot.is_demo(), now),
                power: PowerSource::from_reading(latest),
                last_reading: latest.timestamp,
            },
            outdoor: OutdoorSummary::build(snapshot),
            stats,
            comparison: build_comparison(
                &snapshot.indoor,
                snapshot.outdoor.as_ref(),
                range,
                now,
                offset,
            ),
            trend: TrendSeries::build(&filtered, range, offset),
            statuses: snapshot.statuses,
            source_call_count: snapshot.source_call_count,
        })
    }
}
