//! Min/max/avg/latest reduction over a filtered reading set.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use toocold_types::Reading;

use crate::error::{Error, Result};

/// A single reading value with the time it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatPoint {
    /// The value.
    pub value: f64,
    /// When the reading carrying this value was taken.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Statistics for one metric (temperature or humidity).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    /// Last reading in the window.
    pub latest: StatPoint,
    /// Smallest value; the earliest reading wins ties.
    pub min: StatPoint,
    /// Largest value; the earliest reading wins ties.
    pub max: StatPoint,
    /// Arithmetic mean.
    pub avg: f64,
}

impl MetricStats {
    fn compute(readings: &[Reading], value: impl Fn(&Reading) -> f64) -> Option<Self> {
        let first = readings.first()?;
        let last = readings.last()?;

        let point = |r: &Reading| StatPoint {
            value: value(r),
            timestamp: r.timestamp,
        };

        let mut min = first;
        let mut max = first;
        let mut sum = 0.0;
        for reading in readings {
            let v = value(reading);
            if v < value(min) {
                min = reading;
            }
            if v > value(max) {
                max = reading;
            }
            sum += v;
        }

        Some(Self {
            latest: point(last),
            min: point(min),
            max: point(max),
            avg: sum / readings.len() as f64,
        })
    }
}

/// Statistics over a window of readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Temperature statistics in °C.
    pub temp: MetricStats,
    /// Humidity statistics in %RH.
    pub hum: MetricStats,
    /// Number of readings behind the averages.
    pub count: usize,
}

/// Reduce a filtered, oldest-first reading set to its statistics.
///
/// Returns [`Error::EmptyDataSet`] when `readings` is empty.
///
/// ```
/// use time::OffsetDateTime;
/// use toocold_core::compute_stats;
/// use toocold_types::Reading;
///
/// let t = OffsetDateTime::UNIX_EPOCH;
/// let readings: Vec<Reading> = [10.0, 30.0, 20.0]
///     .iter()
///     .map(|temp| Reading::new(t, *temp, 50.0))
///     .collect();
///
/// let stats = compute_stats(&readings).unwrap();
/// assert_eq!(stats.temp.min.value, 10.0);
/// assert_eq!(stats.temp.max.value, 30.0);
/// assert_eq!(stats.temp.avg, 20.0);
/// assert_eq!(stats.temp.latest.value, 20.0);
/// ```
pub fn compute_stats(readings: &[Reading]) -> Result<StatsSummary> {
    let temp = MetricStats::compute(readings, |r| r.temp).ok_or(Error::EmptyDataSet)?;
    let hum = MetricStats::compute(readings, |r| r.hum).ok_or(Error::EmptyDataSet)?;

    Ok(StatsSummary {
        temp,
        hum,
        count: readings.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::Duration;
    use time::macros::datetime;

    fn series(values: &[(f64, f64)]) -> Vec<Reading> {
        let base = datetime!(2025-01-31 00:00 UTC);
        values
            .iter()
            .enumerate()
            .map(|(i, (t, h))| Reading::new(base + Duration::minutes(i as i64 * 30), *t, *h))
            .collect()
    }

    #[test]
    fn test_stats_basic() {
        let readings = series(&[(10.0, 40.0), (30.0, 60.0), (20.0, 50.0)]);
        let stats = compute_stats(&readings).unwrap();

        assert_eq!(stats.temp.min.value, 10.0);
        assert_eq!(stats.temp.max.value, 30.0);
        assert_eq!(stats.temp.avg, 20.0);
        assert_eq!(stats.temp.latest.value, 20.0);
        assert_eq!(stats.hum.min.value, 40.0);
        assert_eq!(stats.hum.max.value, 60.0);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_stats_timestamps_follow_selected_readings() {
        let readings = series(&[(10.0, 40.0), (30.0, 60.0), (20.0, 50.0)]);
        let stats = compute_stats(&readings).unwrap();

        assert_eq!(stats.temp.min.timestamp, readings[0].timestamp);
        assert_eq!(stats.temp.max.timestamp, readings[1].timestamp);
        assert_eq!(stats.temp.latest.timestamp, readings[2].timestamp);
    }

    #[test]
    fn test_stats_ties_resolve_leftmost() {
        let readings = series(&[(15.0, 50.0), (25.0, 50.0), (15.0, 50.0), (25.0, 50.0)]);
        let stats = compute_stats(&readings).unwrap();

        assert_eq!(stats.temp.min.timestamp, readings[0].timestamp);
        assert_eq!(stats.temp.max.timestamp, readings[1].timestamp);
        assert_eq!(stats.hum.min.timestamp, readings[0].timestamp);
        assert_eq!(stats.hum.max.timestamp, readings[0].timestamp);
    }

    #[test]
    fn test_stats_empty() {
        assert!(matches!(compute_stats(&[]), Err(Error::EmptyDataSet)));
    }

    #[test]
    fn test_stats_single_reading() {
        let readings = series(&[(21.5, 45.0)]);
        let stats = compute_stats(&readings).unwrap();
        assert_eq!(stats.temp.min, stats.temp.max);
        assert_eq!(stats.temp.avg, 21.5);
        assert_eq!(stats.count, 1);
    }

    proptest! {
        #[test]
        fn prop_avg_between_min_and_max(values in proptest::collection::vec((-30.0f64..50.0, 0.0f64..100.0), 1..60)) {
            let readings = series(&values);
            let stats = compute_stats(&readings).unwrap();
            prop_assert!(stats.temp.min.value <= stats.temp.avg + 1e-9);
            prop_assert!(stats.temp.avg <= stats.temp.max.value + 1e-9);
            prop_assert!(stats.hum.min.value <= stats.hum.avg + 1e-9);
            prop_assert!(stats.hum.avg <= stats.hum.max.value + 1e-9);
        }
    }
}
