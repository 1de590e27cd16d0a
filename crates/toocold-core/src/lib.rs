//! Data aggregation and derived-metrics pipeline for the Too Cold dashboard.
//!
//! This crate fetches three independent, failure-prone data sources (an indoor
//! sensor feed, an outdoor weather API and an air-quality API), reconciles
//! their time bases, derives comfort metrics and exposes one consistent
//! [`Snapshot`] per refresh cycle.
//!
//! # Features
//!
//! - **Isolated fetchers**: every source falls back on its own; only a failure of
//!   the cycle itself takes the dashboard offline
//! - **Demo mode**: an unconfigured indoor feed serves a synthetic series
//! - **Derived metrics**: comfort score, dew point, feels-like temperature
//! - **Window statistics**: latest/min/max/avg over a [`TimeRange`]
//! - **Comparison buckets**: inside vs outside values at aligned instants
//! - **Testable transport**: fetchers run against [`MockTransport`] in tests
//!
//! # Data Flow
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | fetch | [`sources`] | readings / outdoor / air quality + status |
//! | assemble | [`orchestrator`] | [`Snapshot`] published via `watch` |
//! | derive | [`derived`], [`stats`], [`buckets`], [`sensor`] | plain values |
//! | present | [`view`] | [`DashboardView`] |
//!
//! # Quick Start
//!
//! ```no_run
//! use toocold_core::{Aggregator, DashboardConfig, DashboardView, ReqwestTransport};
//! use toocold_types::TimeRange;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::default();
//!     let transport = ReqwestTransport::new(config.request_timeout())?;
//!     let aggregator = Aggregator::new(transport, config);
//!
//!     let snapshot = aggregator.refresh().await?;
//!     let view = DashboardView::build(
//!         &snapshot,
//!         TimeRange::Day,
//!         snapshot.fetched_at,
//!         snapshot.display_offset(),
//!     )?;
//!     println!("Comfort: {} ({})", view.comfort.score, view.comfort.label);
//!     Ok(())
//! }
//! ```

pub mod buckets;
pub mod config;
pub mod derived;
pub mod error;
pub mod http;
pub mod mock;
pub mod orchestrator;
pub mod sensor;
pub mod snapshot;
pub mod sources;
pub mod stats;
pub mod timeseries;
pub mod traits;
pub mod view;

// Core exports
pub use config::{DashboardConfig, ValidationError};
pub use error::{Error, Result, SourceError};
pub use orchestrator::{Aggregator, Connectivity, DashboardState};
pub use snapshot::{Snapshot, SourceStatuses};
pub use traits::{HttpResponse, HttpTransport, TransportError};

// Transport implementations
pub use http::ReqwestTransport;
pub use mock::{MockReply, MockTransport, RecordedRequest};

// Pipeline exports
pub use buckets::{Comparison, bucket_steps, build_comparison};
pub use derived::{ComfortLabel, ComfortScore, DerivedMetrics, dew_point, feels_like};
pub use sensor::{PowerSource, SensorHealth};
pub use sources::{CallCounter, Fetched, SourceKind};
pub use stats::{MetricStats, StatPoint, StatsSummary, compute_stats};
pub use timeseries::{filter_range, find_closest, find_hour_index};
pub use view::{DashboardView, Hero, OutdoorSummary, SensorStatus, TrendSeries};

// Re-export from toocold-types
pub use toocold_types::{
    AirQualitySnapshot, Coordinates, OutdoorSnapshot, Reading, SourceStatus, TimeRange,
    WeatherCondition,
};
