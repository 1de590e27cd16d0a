//! Refresh orchestration.
//!
//! The [`Aggregator`] runs the three fetchers concurrently, assembles a
//! [`Snapshot`] and publishes it through a `watch` channel.
//!
//! # Publication
//!
//! Subscribers receive a [`DashboardState`] holding an `Arc<Snapshot>`. A new
//! refresh swaps in a new `Arc`; readers holding the previous one keep a
//! consistent view. If a refresh fails, the previous snapshot stays published
//! and only the connectivity indicator switches to [`Connectivity::Offline`].
//!
//! # Example
//!
//! ```
//! use toocold_core::{Aggregator, DashboardConfig, MockTransport};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Demo mode never touches the network for indoor data.
//!     let aggregator = Aggregator::new(MockTransport::new(), DashboardConfig::default());
//!     let snapshot = aggregator.refresh().await.unwrap();
//!     assert_eq!(snapshot.indoor.len(), 48);
//!     assert_eq!(snapshot.source_call_count, 3);
//! }
//! ```

use core::fmt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::DashboardConfig;
use crate::error::{Error, Result, SourceError};
use crate::snapshot::{Snapshot, SourceStatuses};
use crate::sources::{
    CallCounter, Fetched, SourceKind, fetch_air_quality, fetch_indoor, fetch_weather,
};
use crate::traits::HttpTransport;

/// Whether the last refresh cycle completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connectivity {
    /// No refresh has completed yet.
    #[default]
    Pending,
    /// The last refresh published a snapshot.
    Live,
    /// The last refresh failed.
    Offline,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Pending => write!(f, "PENDING"),
            Connectivity::Live => write!(f, "LIVE"),
            Connectivity::Offline => write!(f, "OFFLINE"),
        }
    }
}

/// What the presentation layer observes.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// The current snapshot, if any refresh has succeeded.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Outcome of the most recent refresh.
    pub connectivity: Connectivity,
    /// When the current snapshot was published.
    pub last_updated: Option<OffsetDateTime>,
    /// Why the most recent refresh failed.
    pub last_error: Option<String>,
}

/// Runs refresh cycles and publishes their snapshots.
pub struct Aggregator<T: HttpTransport> {
    transport: Arc<T>,
    config: DashboardConfig,
    state_tx: watch::Sender<DashboardState>,
    /// UTC offset from the most recent successful weather fetch.
    last_offset_seconds: AtomicI32,
}

impl<T: HttpTransport> fmt::Debug for Aggregator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("config", &self.config)
            .field("connectivity", &self.state_tx.borrow().connectivity)
            .finish()
    }
}

impl<T: HttpTransport> Aggregator<T> {
    /// Create an aggregator owning `transport`.
    pub fn new(transport: T, config: DashboardConfig) -> Self {
        Self::with_shared_transport(Arc::new(transport), config)
    }

    /// Create an aggregator sharing `transport` with the caller.
    pub fn with_shared_transport(transport: Arc<T>, config: DashboardConfig) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::default());
        Self {
            transport,
            config,
            state_tx,
            last_offset_seconds: AtomicI32::new(0),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    /// A copy of the current state.
    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.state_tx.borrow().snapshot.clone()
    }

    /// Run one refresh cycle now.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        self.refresh_at(OffsetDateTime::now_utc()).await
    }

    /// Run one refresh cycle as of `now`.
    ///
    /// On success the new snapshot is published and returned. On failure the
    /// previous snapshot is kept and the state switches to offline.
    pub async fn refresh_at(&self, now: OffsetDateTime) -> Result<Arc<Snapshot>> {
        match self.build_snapshot(now).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let published = Arc::clone(&snapshot);
                self.state_tx.send_modify(|state| {
                    state.snapshot = Some(published);
                    state.connectivity = Connectivity::Live;
                    state.last_updated = Some(now);
                    state.last_error = None;
                });
                info!(
                    "Refresh complete: {} indoor readings, indoor {}, weather {}, air quality {}",
                    snapshot.indoor.len(),
                    snapshot.statuses.indoor,
                    snapshot.statuses.weather,
                    snapshot.statuses.air_quality
                );
                Ok(snapshot)
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
                let message = e.to_string();
                self.state_tx.send_modify(|state| {
                    state.connectivity = Connectivity::Offline;
                    state.last_error = Some(message);
                });
                Err(e)
            }
        }
    }

    async fn build_snapshot(&self, now: OffsetDateTime) -> Result<Snapshot> {
        let counter = CallCounter::new();
        let transport = self.transport.as_ref();
        let config = &self.config;
        debug!("Starting refresh at {}", now);

        let indoor = AssertUnwindSafe(fetch_indoor(transport, config, now, &counter)).catch_unwind();
        let weather = AssertUnwindSafe(fetch_weather(transport, config, &counter)).catch_unwind();
        let air_quality =
            AssertUnwindSafe(fetch_air_quality(transport, config, &counter)).catch_unwind();

        let (indoor, weather, air_quality) = tokio::join!(indoor, weather, air_quality);

        let indoor = indoor.map_err(|p| {
            Error::RefreshFailed(format!("indoor fetch panicked: {}", panic_message(&*p)))
        })?;
        if indoor.value.is_empty() {
            return Err(Error::RefreshFailed(
                "indoor fetch produced no readings".to_string(),
            ));
        }

        let weather = weather.unwrap_or_else(|p| {
            contained_panic(SourceKind::Weather, &config.weather_api, &*p)
        });
        let air_quality = air_quality.unwrap_or_else(|p| {
            contained_panic(SourceKind::AirQuality, &config.air_quality_api, &*p)
        });

        let last_known_offset_seconds = match &weather.value {
            Some(outdoor) => {
                self.last_offset_seconds
                    .store(outdoor.utc_offset_seconds, Ordering::Relaxed);
                outdoor.utc_offset_seconds
            }
            None => self.last_offset_seconds.load(Ordering::Relaxed),
        };

        Ok(Snapshot {
            statuses: SourceStatuses {
                indoor: indoor.status,
                weather: weather.status,
                air_quality: air_quality.status,
            },
            indoor: indoor.value,
            outdoor: weather.value,
            air_quality: air_quality.value,
            fetched_at: now,
            source_call_count: counter.get(),
            last_known_offset_seconds,
        })
    }
}

fn contained_panic<V>(kind: SourceKind, url: &str, payload: &(dyn Any + Send)) -> Fetched<Option<V>> {
    let err = SourceError::Unavailable {
        kind,
        url: url.to_string(),
        reason: format!("fetch panicked: {}", panic_message(payload)),
    };
    error!("{}", err);
    Fetched::fallback(None, err)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use time::macros::datetime;
    use toocold_types::SourceStatus;

    const FEED: &str = "https://feed.example.com/readings";
    const NOW: OffsetDateTime = datetime!(2025-01-31 12:00 UTC);

    fn live_config() -> DashboardConfig {
        DashboardConfig {
            indoor_url: FEED.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_demo_refresh_publishes_snapshot() {
        let aggregator = Aggregator::new(MockTransport::new(), DashboardConfig::default());
        let mut rx = aggregator.subscribe();

        let snapshot = aggregator.refresh_at(NOW).await.unwrap();
        assert_eq!(snapshot.statuses.indoor, SourceStatus::Demo);
        assert_eq!(snapshot.statuses.weather, SourceStatus::Error);
        assert_eq!(snapshot.statuses.air_quality, SourceStatus::Error);
        assert_eq!(snapshot.source_call_count, 3);
        assert!(snapshot.outdoor.is_none());

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.connectivity, Connectivity::Live);
        assert_eq!(state.last_updated, Some(NOW));
        assert!(Arc::ptr_eq(&state.snapshot.unwrap(), &snapshot));
    }

    #[tokio::test]
    async fn test_call_count_resets_each_refresh() {
        let aggregator = Aggregator::new(MockTransport::new(), DashboardConfig::default());
        aggregator.refresh_at(NOW).await.unwrap();
        let second = aggregator.refresh_at(NOW).await.unwrap();
        assert_eq!(second.source_call_count, 3);
    }

    #[tokio::test]
    async fn test_indoor_panic_keeps_previous_snapshot() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(FEED, 200, r#"[{"timestamp":"2025-01-31T11:59:00Z","temp":21.0,"hum":45}]"#).await;
        let aggregator = Aggregator::with_shared_transport(Arc::clone(&transport), live_config());

        let first = aggregator.refresh_at(NOW).await.unwrap();
        assert_eq!(first.statuses.indoor, SourceStatus::Ok);

        transport.panic_on(FEED, "feed exploded").await;
        let err = aggregator.refresh_at(NOW).await.unwrap_err();
        assert!(matches!(err, Error::RefreshFailed(ref m) if m.contains("feed exploded")));

        let state = aggregator.state();
        assert_eq!(state.connectivity, Connectivity::Offline);
        assert!(state.last_error.is_some());
        assert!(Arc::ptr_eq(&state.snapshot.unwrap(), &first));
        assert_eq!(state.last_updated, Some(NOW));
    }

    #[tokio::test]
    async fn test_outdoor_panic_is_contained() {
        let transport = Arc::new(MockTransport::new());
        let config = DashboardConfig::default();
        transport.panic_on(&config.weather_api, "weather exploded").await;
        let aggregator = Aggregator::with_shared_transport(Arc::clone(&transport), config);

        let snapshot = aggregator.refresh_at(NOW).await.unwrap();
        assert_eq!(snapshot.statuses.weather, SourceStatus::Error);
        assert!(snapshot.outdoor.is_none());
        assert_eq!(aggregator.state().connectivity, Connectivity::Live);
    }

    #[tokio::test]
    async fn test_display_offset_survives_weather_outage() {
        let transport = Arc::new(MockTransport::new());
        let config = DashboardConfig::default();
        let weather_api = config.weather_api.clone();
        transport
            .respond(
                &weather_api,
                200,
                r#"{"utc_offset_seconds": 19800,
                    "current": {"temperature_2m": 14.2, "relative_humidity_2m": 71, "weather_code": 0}}"#,
            )
            .await;
        let aggregator = Aggregator::with_shared_transport(Arc::clone(&transport), config);

        let first = aggregator.refresh_at(NOW).await.unwrap();
        assert_eq!(first.statuses.weather, SourceStatus::Ok);
        assert_eq!(first.display_offset().whole_seconds(), 19800);

        transport.fail(&weather_api, "connection refused").await;
        let second = aggregator.refresh_at(NOW).await.unwrap();
        assert!(second.outdoor.is_none());
        assert_eq!(second.last_known_offset_seconds, 19800);
        assert_eq!(second.display_offset(), first.display_offset());
    }

    #[tokio::test]
    async fn test_display_offset_is_utc_before_any_weather() {
        let aggregator = Aggregator::new(MockTransport::new(), DashboardConfig::default());
        let snapshot = aggregator.refresh_at(NOW).await.unwrap();
        assert_eq!(snapshot.last_known_offset_seconds, 0);
        assert_eq!(snapshot.display_offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn test_connectivity_display() {
        assert_eq!(Connectivity::Live.to_string(), "LIVE");
        assert_eq!(Connectivity::Offline.to_string(), "OFFLINE");
        assert_eq!(Connectivity::default(), Connectivity::Pending);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*boxed), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*boxed), "unknown panic");
    }
}
