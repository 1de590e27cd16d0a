//! Time-series helpers shared by the stats, bucket and trend computations.
//!
//! All lookups are linear scans. Series are short (one feed response and at
//! most eight days of hourly data), and scanning keeps the tie-break rule
//! simple: the first candidate found wins.

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use toocold_types::{ParseError, ParseResult, Reading, TimeRange};

/// Find the reading whose timestamp is closest to `target`.
///
/// Ties resolve to the earliest position in the slice. Returns `None` for an
/// empty slice.
pub fn find_closest(series: &[Reading], target: OffsetDateTime) -> Option<&Reading> {
    let mut best: Option<&Reading> = None;
    for reading in series {
        let diff = (reading.timestamp - target).abs();
        match best {
            Some(b) if (b.timestamp - target).abs() <= diff => {}
            _ => best = Some(reading),
        }
    }
    best
}

/// Parse an hourly label (`2025-01-31T14:00`) as a wall-clock time at `offset`.
pub fn parse_hour_label(label: &str, offset: UtcOffset) -> ParseResult<OffsetDateTime> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    PrimitiveDateTime::parse(label.trim(), &format)
        .map(|dt| dt.assume_offset(offset))
        .map_err(|_| ParseError::InvalidTimestamp(label.to_string()))
}

/// Find the index of the hourly label closest to `target`.
///
/// Labels are interpreted at `offset`. Unparseable labels are skipped. Ties
/// resolve to the lowest index. Returns `None` when no label parses.
pub fn find_hour_index(labels: &[String], target: OffsetDateTime, offset: UtcOffset) -> Option<usize> {
    let mut best: Option<(usize, time::Duration)> = None;
    for (i, label) in labels.iter().enumerate() {
        let Ok(at) = parse_hour_label(label, offset) else {
            continue;
        };
        let diff = (at - target).abs();
        if best.is_none_or(|(_, min)| diff < min) {
            best = Some((i, diff));
        }
    }
    best.map(|(i, _)| i)
}

/// Keep the readings strictly newer than `now - range.duration()`.
///
/// Order is preserved.
pub fn filter_range(series: &[Reading], range: TimeRange, now: OffsetDateTime) -> Vec<Reading> {
    let cutoff = now - range.duration();
    series
        .iter()
        .filter(|r| r.timestamp > cutoff)
        .copied()
        .collect()
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::Duration;
    use time::macros::{datetime, offset};

    fn reading_at(ts: OffsetDateTime, temp: f64) -> Reading {
        Reading::new(ts, temp, 50.0)
    }

    // --- find_closest tests ---

    #[test]
    fn test_find_closest_empty() {
        assert!(find_closest(&[], datetime!(2025-01-31 12:00 UTC)).is_none());
    }

    #[test]
    fn test_find_closest_picks_nearest() {
        let base = datetime!(2025-01-31 12:00 UTC);
        let series = [
            reading_at(base, 1.0),
            reading_at(base + Duration::minutes(30), 2.0),
            reading_at(base + Duration::minutes(60), 3.0),
        ];
        let found = find_closest(&series, base + Duration::minutes(50)).unwrap();
        assert_eq!(found.temp, 3.0);
    }

    #[test]
    fn test_find_closest_tie_prefers_first() {
        let base = datetime!(2025-01-31 12:00 UTC);
        let series = [
            reading_at(base, 1.0),
            reading_at(base + Duration::minutes(20), 2.0),
        ];
        let found = find_closest(&series, base + Duration::minutes(10)).unwrap();
        assert_eq!(found.temp, 1.0);
    }

    // --- hour label tests ---

    #[test]
    fn test_parse_hour_label_with_offset() {
        let at = parse_hour_label("2025-01-31T14:00", offset!(+5:30)).unwrap();
        assert_eq!(at, datetime!(2025-01-31 08:30 UTC));
    }

    #[test]
    fn test_parse_hour_label_invalid() {
        let err = parse_hour_label("yesterday", UtcOffset::UTC).unwrap_err();
        assert_eq!(err, ParseError::InvalidTimestamp("yesterday".to_string()));
    }

    #[test]
    fn test_find_hour_index() {
        let labels: Vec<String> = ["2025-01-31T10:00", "2025-01-31T11:00", "2025-01-31T12:00"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let idx = find_hour_index(&labels, datetime!(2025-01-31 11:20 UTC), UtcOffset::UTC);
        assert_eq!(idx, Some(1));

        // Exactly halfway resolves to the lower index.
        let idx = find_hour_index(&labels, datetime!(2025-01-31 11:30 UTC), UtcOffset::UTC);
        assert_eq!(idx, Some(1));
    }

    #[test]
    fn test_find_hour_index_skips_bad_labels() {
        let labels = vec!["garbage".to_string(), "2025-01-31T10:00".to_string()];
        let idx = find_hour_index(&labels, datetime!(2025-01-31 00:00 UTC), UtcOffset::UTC);
        assert_eq!(idx, Some(1));

        assert_eq!(
            find_hour_index(&["nope".to_string()], datetime!(2025-01-31 00:00 UTC), UtcOffset::UTC),
            None
        );
    }

    // --- filter_range tests ---

    #[test]
    fn test_filter_range_boundary() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let series = [
            reading_at(now - Duration::hours(1) - Duration::milliseconds(1), 1.0),
            reading_at(now - Duration::hours(1), 2.0),
            reading_at(now - Duration::minutes(59), 3.0),
        ];
        let filtered = filter_range(&series, TimeRange::OneHour, now);
        let temps: Vec<f64> = filtered.iter().map(|r| r.temp).collect();
        assert_eq!(temps, vec![3.0]);
    }

    #[test]
    fn test_filter_range_week_keeps_all_recent() {
        let now = datetime!(2025-01-31 12:00 UTC);
        let series: Vec<Reading> = (0..10)
            .map(|i| reading_at(now - Duration::hours(10 - i), i as f64))
            .collect();
        assert_eq!(filter_range(&series, TimeRange::Week, now).len(), 10);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(21.46), 21.5);
        assert_eq!(round1(-3.04), -3.0);
    }

    proptest! {
        #[test]
        fn prop_wider_range_never_keeps_fewer(offsets in proptest::collection::vec(0i64..1_000_000, 0..50)) {
            let now = datetime!(2025-01-31 12:00 UTC);
            let series: Vec<Reading> = offsets
                .iter()
                .map(|s| reading_at(now - Duration::seconds(*s), 20.0))
                .collect();
            let mut previous = 0;
            for range in TimeRange::ALL {
                let kept = filter_range(&series, range, now).len();
                prop_assert!(kept >= previous);
                previous = kept;
            }
        }
    }
}
