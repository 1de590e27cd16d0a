//! Aligned inside/outside comparison buckets.
//!
//! For a [`TimeRange`] the bucketer picks a fixed number of instants counting
//! backward from now and samples both the indoor series and the outdoor hourly
//! series at each of them. All five output arrays have the same length.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

use toocold_types::{OutdoorSnapshot, Reading, TimeRange};

use crate::timeseries::{find_closest, find_hour_index, round1};

/// Bucket count and spacing for a range.
///
/// | range | count | step |
/// |-------|-------|------|
/// | 1h | 5 | 12 min |
/// | 3h | 5 | 36 min |
/// | 6h | 6 | 60 min |
/// | 12h | 6 | 2 h |
/// | 24h | 6 | 4 h |
/// | 1w | 7 | 24 h |
pub fn bucket_steps(range: TimeRange) -> (usize, Duration) {
    match range {
        TimeRange::OneHour => (5, Duration::minutes(12)),
        TimeRange::ThreeHours => (5, Duration::minutes(36)),
        TimeRange::SixHours => (6, Duration::hours(1)),
        TimeRange::TwelveHours => (6, Duration::hours(2)),
        TimeRange::Day => (6, Duration::hours(4)),
        TimeRange::Week => (7, Duration::hours(24)),
    }
}

/// Inside vs outside values at aligned instants, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comparison {
    /// One label per bucket.
    pub labels: Vec<String>,
    /// Indoor temperature per bucket, one decimal.
    pub in_temp: Vec<f64>,
    /// Indoor humidity per bucket, one decimal.
    pub in_hum: Vec<f64>,
    /// Outdoor temperature per bucket; 0 when unavailable.
    pub out_temp: Vec<f64>,
    /// Outdoor humidity per bucket; 0 when unavailable.
    pub out_hum: Vec<f64>,
}

impl Comparison {
    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Build the comparison buckets for `range`.
///
/// Indoor values come from the nearest reading (first found on ties) and are
/// rounded to one decimal; an empty series yields `0`. Outdoor values come from
/// the nearest hourly entry and are `0` when outdoor or hourly data is absent,
/// the entry is missing, or the index is out of bounds. Labels are rendered at
/// `display_offset`.
pub fn build_comparison(
    indoor: &[Reading],
    outdoor: Option<&OutdoorSnapshot>,
    range: TimeRange,
    now: OffsetDateTime,
    display_offset: UtcOffset,
) -> Comparison {
    let (count, step) = bucket_steps(range);
    let mut out = Comparison {
        labels: Vec::with_capacity(count),
        in_temp: Vec::with_capacity(count),
        in_hum: Vec::with_capacity(count),
        out_temp: Vec::with_capacity(count),
        out_hum: Vec::with_capacity(count),
    };

    for i in (0..count).rev() {
        let at = now - step * i as i32;

        out.labels
            .push(bucket_label(range, i, step, at.to_offset(display_offset)));

        match find_closest(indoor, at) {
            Some(reading) => {
                out.in_temp.push(round1(reading.temp));
                out.in_hum.push(round1(reading.hum));
            }
            None => {
                out.in_temp.push(0.0);
                out.in_hum.push(0.0);
            }
        }

        let (temp, hum) = outdoor.map(|o| outdoor_at(o, at)).unwrap_or((0.0, 0.0));
        out.out_temp.push(temp);
        out.out_hum.push(hum);
    }

    out
}

fn outdoor_at(outdoor: &OutdoorSnapshot, at: OffsetDateTime) -> (f64, f64) {
    let Some(hourly) = outdoor.hourly.as_ref() else {
        return (0.0, 0.0);
    };
    let Some(idx) = find_hour_index(&hourly.time, at, outdoor.offset()) else {
        return (0.0, 0.0);
    };
    if idx >= hourly.temperature.len() {
        return (0.0, 0.0);
    }

    let temp = hourly.temperature[idx].unwrap_or(0.0);
    let hum = hourly.humidity.get(idx).copied().flatten().unwrap_or(0.0);
    (temp, hum)
}

fn bucket_label(range: TimeRange, steps_back: usize, step: Duration, local: OffsetDateTime) -> String {
    match range {
        TimeRange::Week => {
            let weekday = local.weekday().to_string();
            weekday.chars().take(3).collect()
        }
        TimeRange::Day if steps_back == 0 => "NOW".to_string(),
        TimeRange::Day => {
            let hours = step.whole_minutes() as f64 * steps_back as f64 / 60.0;
            format!("-{}h", hours.round() as i64)
        }
        _ => format!("{:02}:{:02}", local.hour(), local.minute()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::macros::{datetime, offset};
    use toocold_types::{CurrentConditions, HourlySeries};

    fn indoor_series(now: OffsetDateTime, points: usize) -> Vec<Reading> {
        (0..points)
            .map(|i| {
                let back = (points - 1 - i) as i64;
                Reading::new(now - Duration::minutes(30 * back), 20.0 + i as f64 * 0.01, 50.0)
            })
            .collect()
    }

    fn outdoor_hourly(now: OffsetDateTime, hours: i64) -> OutdoorSnapshot {
        let mut time = Vec::new();
        let mut temperature = Vec::new();
        let mut humidity = Vec::new();
        for h in (0..hours).rev() {
            let at = now - Duration::hours(h);
            time.push(format!(
                "{:04}-{:02}-{:02}T{:02}:00",
                at.year(),
                u8::from(at.month()),
                at.day(),
                at.hour()
            ));
            temperature.push(Some(h as f64));
            humidity.push(Some(60.0));
        }
        OutdoorSnapshot {
            utc_offset_seconds: 0,
            current: CurrentConditions {
                temperature: 10.0,
                humidity: 60.0,
                weather_code: 0,
            },
            hourly: Some(HourlySeries {
                time,
                temperature,
                humidity,
            }),
            daily: None,
        }
    }

    #[test]
    fn test_step_table() {
        let table: Vec<(usize, i64)> = TimeRange::ALL
            .iter()
            .map(|r| {
                let (n, step) = bucket_steps(*r);
                (n, step.whole_minutes())
            })
            .collect();
        assert_eq!(
            table,
            vec![(5, 12), (5, 36), (6, 60), (6, 120), (6, 240), (7, 1440)]
        );
    }

    #[test]
    fn test_day_labels() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let cmp = build_comparison(&indoor_series(now, 48), None, TimeRange::Day, now, UtcOffset::UTC);
        assert_eq!(cmp.labels, vec!["-20h", "-16h", "-12h", "-8h", "-4h", "NOW"]);
    }

    #[test]
    fn test_week_labels_are_weekdays() {
        // 2025-01-31 is a Friday.
        let now = datetime!(2025-01-31 12:00 UTC);
        let cmp = build_comparison(&[], None, TimeRange::Week, now, UtcOffset::UTC);
        assert_eq!(cmp.labels, vec!["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
    }

    #[test]
    fn test_hour_minute_labels_use_display_offset() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let cmp = build_comparison(&[], None, TimeRange::OneHour, now, offset!(+5:30));
        assert_eq!(cmp.labels, vec!["16:42", "16:54", "17:06", "17:18", "17:30"]);
    }

    #[test]
    fn test_missing_outdoor_is_zero_filled() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let cmp = build_comparison(&indoor_series(now, 48), None, TimeRange::SixHours, now, UtcOffset::UTC);
        assert_eq!(cmp.len(), 6);
        assert_eq!(cmp.out_temp, vec![0.0; 6]);
        assert_eq!(cmp.out_hum, vec![0.0; 6]);
        assert_eq!(cmp.in_temp.len(), 6);
    }

    #[test]
    fn test_empty_indoor_is_zero_filled() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let cmp = build_comparison(&[], None, TimeRange::ThreeHours, now, UtcOffset::UTC);
        assert_eq!(cmp.in_temp, vec![0.0; 5]);
        assert_eq!(cmp.in_hum, vec![0.0; 5]);
    }

    #[test]
    fn test_indoor_values_rounded_to_one_decimal() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let indoor = vec![Reading::new(now, 21.456, 48.04)];
        let cmp = build_comparison(&indoor, None, TimeRange::OneHour, now, UtcOffset::UTC);
        assert_eq!(cmp.in_temp[4], 21.5);
        assert_eq!(cmp.in_hum[4], 48.0);
    }

    #[test]
    fn test_outdoor_nearest_hour() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let outdoor = outdoor_hourly(now, 48);
        let cmp = build_comparison(&[], Some(&outdoor), TimeRange::Day, now, UtcOffset::UTC);
        // Temperature at each hour equals its distance from now in hours.
        assert_eq!(cmp.out_temp, vec![20.0, 16.0, 12.0, 8.0, 4.0, 0.0]);
        assert_eq!(cmp.out_hum, vec![60.0; 6]);
    }

    #[test]
    fn test_outdoor_index_out_of_bounds_is_zero() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let mut outdoor = outdoor_hourly(now, 4);
        if let Some(hourly) = outdoor.hourly.as_mut() {
            hourly.temperature.truncate(1);
        }
        let cmp = build_comparison(&[], Some(&outdoor), TimeRange::SixHours, now, UtcOffset::UTC);
        // Only the oldest hour has a temperature; later buckets map past the end.
        assert_eq!(cmp.out_temp.last(), Some(&0.0));
    }

    #[test]
    fn test_outdoor_missing_value_is_zero() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let mut outdoor = outdoor_hourly(now, 2);
        if let Some(hourly) = outdoor.hourly.as_mut() {
            hourly.temperature[1] = None;
        }
        let cmp = build_comparison(&[], Some(&outdoor), TimeRange::OneHour, now, UtcOffset::UTC);
        assert_eq!(cmp.out_temp[4], 0.0);
        assert_eq!(cmp.out_hum[4], 60.0);
    }

    proptest! {
        #[test]
        fn prop_arrays_have_equal_length(range_idx in 0usize..6, points in 0usize..100, with_outdoor in any::<bool>()) {
            let now = datetime!(2025-01-31 12:00 UTC);
            let range = TimeRange::ALL[range_idx];
            let outdoor = outdoor_hourly(now, 24 * 8);
            let cmp = build_comparison(
                &indoor_series(now, points),
                with_outdoor.then_some(&outdoor),
                range,
                now,
                UtcOffset::UTC,
            );
            let (count, _) = bucket_steps(range);
            prop_assert_eq!(cmp.labels.len(), count);
            prop_assert_eq!(cmp.in_temp.len(), count);
            prop_assert_eq!(cmp.in_hum.len(), count);
            prop_assert_eq!(cmp.out_temp.len(), count);
            prop_assert_eq!(cmp.out_hum.len(), count);
        }
    }
}
