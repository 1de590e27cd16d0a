//! Platform-agnostic types for the Too Cold room-climate dashboard.
//!
//! This crate provides the shared data model used by the aggregation
//! pipeline (toocold-core) and any presentation layer that consumes it.
//!
//! # Features
//!
//! - Indoor [`Reading`]s and their wire format
//! - Outdoor weather and air-quality snapshots
//! - The [`TimeRange`] selector used by every filtered view
//! - Per-source [`SourceStatus`] indicators
//!
//! # Example
//!
//! ```
//! use toocold_types::{SourceStatus, TimeRange};
//!
//! let range: TimeRange = "6h".parse().unwrap();
//! assert_eq!(range.duration().whole_hours(), 6);
//! assert_eq!(SourceStatus::Demo.to_string(), "DEMO");
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    AirQualitySnapshot, Coordinates, CurrentConditions, DailySeries, HourlySeries,
    OutdoorSnapshot, Reading, SourceStatus, TimeRange, WeatherCondition, parse_timestamp,
};


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn time_range_parse_accepts_only_known_labels(s in "\\PC{0,6}") {
            match s.parse::<TimeRange>() {
                Ok(range) => prop_assert_eq!(range.as_str(), s.trim().to_ascii_lowercase()),
                Err(ParseError::UnknownTimeRange(raw)) => prop_assert_eq!(raw, s),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
