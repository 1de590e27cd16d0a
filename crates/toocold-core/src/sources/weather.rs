//! Outdoor weather source (Open-Meteo forecast API).

use tracing::{debug, error};

use toocold_types::OutdoorSnapshot;

use crate::config::DashboardConfig;
use crate::error::SourceError;
use crate::sources::{CallCounter, Fetched, SourceKind};
use crate::traits::HttpTransport;

/// Days of hourly history requested, enough for the one-week view.
pub const PAST_DAYS: u32 = 7;
/// Days of forecast requested.
pub const FORECAST_DAYS: u32 = 1;

/// Query parameters for a forecast request.
pub fn weather_query(config: &DashboardConfig) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", config.coords.lat.to_string()),
        ("longitude", config.coords.lon.to_string()),
        (
            "current",
            "temperature_2m,relative_humidity_2m,weather_code".to_string(),
        ),
        ("hourly", "temperature_2m,relative_humidity_2m".to_string()),
        ("daily", "uv_index_max,wind_speed_10m_max".to_string()),
        ("timezone", config.timezone.clone()),
        ("past_days", PAST_DAYS.to_string()),
        ("forecast_days", FORECAST_DAYS.to_string()),
    ]
}

/// Fetch current, hourly and daily outdoor conditions.
///
/// Any failure yields an absent snapshot with status `ERROR`.
pub async fn fetch_weather<T>(
    transport: &T,
    config: &DashboardConfig,
    counter: &CallCounter,
) -> Fetched<Option<OutdoorSnapshot>>
where
    T: HttpTransport + ?Sized,
{
    counter.record();

    match try_fetch(transport, config).await {
        Ok(snapshot) => Fetched::ok(Some(snapshot)),
        Err(err) => {
            error!("Weather fetch failed: {}", err);
            Fetched::fallback(None, err)
        }
    }
}

async fn try_fetch<T>(transport: &T, config: &DashboardConfig) -> Result<OutdoorSnapshot, SourceError>
where
    T: HttpTransport + ?Sized,
{
    let url = config.weather_api.as_str();
    let response = transport
        .get_text(url, &weather_query(config))
        .await
        .map_err(|e| SourceError::Unavailable {
            kind: SourceKind::Weather,
            url: url.to_string(),
            reason: e.reason,
        })?;

    if !response.is_success() {
        return Err(SourceError::HttpStatus {
            kind: SourceKind::Weather,
            url: url.to_string(),
            status: response.status,
        });
    }

    let snapshot: OutdoorSnapshot =
        serde_json::from_str(&response.body).map_err(|e| SourceError::Malformed {
            kind: SourceKind::Weather,
            reason: e.to_string(),
        })?;
    debug!(
        "Weather: {:.1}°C, {} hourly points",
        snapshot.current.temperature,
        snapshot.hourly.as_ref().map_or(0, |h| h.time.len())
    );
    Ok(snapshot)
}
