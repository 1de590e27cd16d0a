//! Indoor sensor feed.
//!
//! The feed answers a plain GET with a JSON array of readings, newest first.
//! A `_=<unix millis>` query parameter defeats intermediate caches.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use toocold_types::Reading;

use crate::config::{DEMO_INDOOR_URL, DashboardConfig};
use crate::error::SourceError;
use crate::http::validate_url;
use crate::sources::synthetic::synthetic_series;
use crate::sources::{CallCounter, Fetched, SourceKind};
use crate::traits::HttpTransport;

/// Marker that identifies an unedited placeholder URL.
const PLACEHOLDER_MARKER: &str = "YOUR_";

/// Whether `url` means "no real indoor source configured".
pub fn is_demo_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == DEMO_INDOOR_URL || url.contains(PLACEHOLDER_MARKER)
}

/// Fetch the indoor series.
///
/// Never fails: demo mode and every error fall back to
/// [`synthetic_series`] with status `DEMO` or `ERROR` respectively. The
/// returned series is oldest first and never empty.
pub async fn fetch_indoor<T>(
    transport: &T,
    config: &DashboardConfig,
    now: OffsetDateTime,
    counter: &CallCounter,
) -> Fetched<Vec<Reading>>
where
    T: HttpTransport + ?Sized,
{
    counter.record();

    match try_fetch(transport, &config.indoor_url, now).await {
        Ok(readings) => {
            debug!("Indoor feed returned {} readings", readings.len());
            Fetched::ok(readings)
        }
        Err(err @ SourceError::Misconfigured { .. }) => {
            info!("Indoor source in demo mode: {}", err);
            Fetched::fallback(synthetic_series(now), err)
        }
        Err(err) => {
            warn!("Indoor fetch failed, serving synthetic data: {}", err);
            Fetched::fallback(synthetic_series(now), err)
        }
    }
}

async fn try_fetch<T>(
    transport: &T,
    url: &str,
    now: OffsetDateTime,
) -> Result<Vec<Reading>, SourceError>
where
    T: HttpTransport + ?Sized,
{
    if is_demo_url(url) {
        return Err(SourceError::Misconfigured {
            kind: SourceKind::Indoor,
            reason: "no indoor feed URL configured".to_string(),
        });
    }
    let url = validate_url(url).map_err(|e| SourceError::Misconfigured {
        kind: SourceKind::Indoor,
        reason: e.to_string(),
    })?;

    let cache_bust = (now.unix_timestamp_nanos() / 1_000_000).to_string();
    let response = transport
        .get_text(&url, &[("_", cache_bust)])
        .await
        .map_err(|e| SourceError::Unavailable {
            kind: SourceKind::Indoor,
            url: url.clone(),
            reason: e.reason,
        })?;
    debug!("Indoor feed responded with HTTP {}", response.status);

    if !response.is_success() {
        return Err(SourceError::HttpStatus {
            kind: SourceKind::Indoor,
            url,
            status: response.status,
        });
    }

    parse_payload(&response.body)
}

/// Parse a newest-first feed payload into an oldest-first series.
///
/// An empty array is rejected so the stored series is never empty.
pub fn parse_payload(body: &str) -> Result<Vec<Reading>, SourceError> {
    let mut readings: Vec<Reading> =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed {
            kind: SourceKind::Indoor,
            reason: e.to_string(),
        })?;

    if readings.is_empty() {
        return Err(SourceError::Malformed {
            kind: SourceKind::Indoor,
            reason: "feed returned no readings".to_string(),
        });
    }

    readings.reverse();
    Ok(readings)
}
