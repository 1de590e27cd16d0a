//! Source fetchers.
//!
//! Each fetcher owns its failure policy: it always returns a [`Fetched`] value
//! carrying either real data or a fallback, plus the [`SourceStatus`] to show
//! for that source. Nothing a source does can fail the refresh cycle.
//!
//! | source | success | failure fallback |
//! |--------|---------|------------------|
//! | [`indoor`] | readings, oldest first | synthetic series |
//! | [`weather`] | [`OutdoorSnapshot`](toocold_types::OutdoorSnapshot) | absent |
//! | [`air_quality`] | [`AirQualitySnapshot`](toocold_types::AirQualitySnapshot) | absent |

pub mod air_quality;
pub mod indoor;
pub mod synthetic;
pub mod weather;

use core::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use toocold_types::SourceStatus;
use tracing::debug;

use crate::error::SourceError;

pub use air_quality::fetch_air_quality;
pub use indoor::{fetch_indoor, is_demo_url};
pub use synthetic::synthetic_series;
pub use weather::fetch_weather;

/// Identifies one of the three data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// The indoor sensor feed.
    Indoor,
    /// The outdoor weather API.
    Weather,
    /// The air-quality API.
    AirQuality,
}

impl SourceKind {
    /// All sources in display order.
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Indoor,
        SourceKind::Weather,
        SourceKind::AirQuality,
    ];
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Indoor => write!(f, "indoor"),
            SourceKind::Weather => write!(f, "weather"),
            SourceKind::AirQuality => write!(f, "air-quality"),
        }
    }
}

/// The outcome of one fetch: a value (real or fallback) and its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// Real data on success, the fallback otherwise.
    pub value: T,
    /// Status indicator for the source.
    pub status: SourceStatus,
    /// The error that triggered the fallback, if any.
    pub error: Option<SourceError>,
}

impl<T> Fetched<T> {
    /// A successful fetch.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            status: SourceStatus::Ok,
            error: None,
        }
    }

    /// A fallback value after `error`.
    pub fn fallback(value: T, error: SourceError) -> Self {
        let status = error.status();
        debug!(source = %error.kind(), %status, "Serving fallback value");
        Self {
            value,
            status,
            error: Some(error),
        }
    }
}

/// Counts source calls within one refresh cycle.
///
/// A fresh counter is created for every refresh, so the count starts at zero.
#[derive(Debug, Default)]
pub struct CallCounter(AtomicU32);

impl CallCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one source call.
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Calls recorded so far.
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_display() {
        let names: Vec<String> = SourceKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["indoor", "weather", "air-quality"]);
    }

    #[test]
    fn test_fetched_fallback_status() {
        let demo: Fetched<Option<u32>> = Fetched::fallback(
            None,
            SourceError::Misconfigured {
                kind: SourceKind::Indoor,
                reason: "demo".to_string(),
            },
        );
        assert_eq!(demo.status, SourceStatus::Demo);
        assert!(demo.error.is_some());

        let ok = Fetched::ok(5);
        assert_eq!(ok.status, SourceStatus::Ok);
        assert!(ok.error.is_none());
    }

    #[test]
    fn test_call_counter() {
        let counter = CallCounter::new();
        assert_eq!(counter.get(), 0);
        counter.record();
        counter.record();
        assert_eq!(counter.get(), 2);
    }
}
