//! Air-quality source (Open-Meteo air-quality API).

use serde::Deserialize;
use tracing::{debug, error};

use toocold_types::AirQualitySnapshot;

use crate::config::DashboardConfig;
use crate::error::SourceError;
use crate::sources::{CallCounter, Fetched, SourceKind};
use crate::traits::HttpTransport;

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: AirQualitySnapshot,
}

/// Query parameters for an air-quality request.
pub fn air_quality_query(config: &DashboardConfig) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", config.coords.lat.to_string()),
        ("longitude", config.coords.lon.to_string()),
        ("current", "us_aqi".to_string()),
        ("timezone", config.timezone.clone()),
    ]
}

/// Fetch the current US AQI.
///
/// Any failure yields an absent snapshot with status `ERROR`.
pub async fn fetch_air_quality<T>(
    transport: &T,
    config: &DashboardConfig,
    counter: &CallCounter,
) -> Fetched<Option<AirQualitySnapshot>>
where
    T: HttpTransport + ?Sized,
{
    counter.record();

    let url = config.air_quality_api.as_str();
    let result = match transport.get_text(url, &air_quality_query(config)).await {
        Err(e) => Err(SourceError::Unavailable {
            kind: SourceKind::AirQuality,
            url: url.to_string(),
            reason: e.reason,
        }),
        Ok(response) if !response.is_success() => Err(SourceError::HttpStatus {
            kind: SourceKind::AirQuality,
            url: url.to_string(),
            status: response.status,
        }),
        Ok(response) => serde_json::from_str::<AirQualityResponse>(&response.body)
            .map(|r| r.current)
            .map_err(|e| SourceError::Malformed {
                kind: SourceKind::AirQuality,
                reason: e.to_string(),
            }),
    };

    match result {
        Ok(snapshot) => {
            debug!("Air quality: US AQI {}", snapshot.us_aqi);
            Fetched::ok(Some(snapshot))
        }
        Err(err) => {
            error!("Air-quality fetch failed: {}", err);
            Fetched::fallback(None, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use toocold_types::SourceStatus;

    #[tokio::test]
    async fn test_fetch_air_quality_success() {
        let config = DashboardConfig::default();
        let transport = MockTransport::new();
        transport
            .respond(&config.air_quality_api, 200, r#"{"current": {"time": "2025-01-31T12:00", "us_aqi": 152}}"#)
            .await;
        let counter = CallCounter::new();

        let fetched = fetch_air_quality(&transport, &config, &counter).await;
        assert_eq!(fetched.status, SourceStatus::Ok);
        assert_eq!(fetched.value, Some(AirQualitySnapshot { us_aqi: 152 }));

        let requests = transport.requests().await;
        assert_eq!(requests[0].param("current"), Some("us_aqi"));
        assert_eq!(requests[0].param("timezone"), Some("Asia/Kolkata"));
    }

    #[tokio::test]
    async fn test_fetch_air_quality_network_failure() {
        let config = DashboardConfig::default();
        let transport = MockTransport::new();
        transport.fail(&config.air_quality_api, "dns error").await;
        let counter = CallCounter::new();

        let fetched = fetch_air_quality(&transport, &config, &counter).await;
        assert_eq!(fetched.status, SourceStatus::Error);
        assert!(fetched.value.is_none());
        assert!(matches!(fetched.error, Some(SourceError::Unavailable { .. })));
        assert_eq!(counter.get(), 1);
    }

    #[tokio::test]
    async fn test_fetch_air_quality_missing_current() {
        let config = DashboardConfig::default();
        let transport = MockTransport::new();
        transport.respond(&config.air_quality_api, 200, "{}").await;

        let fetched = fetch_air_quality(&transport, &config, &CallCounter::new()).await;
        assert!(matches!(fetched.error, Some(SourceError::Malformed { .. })));
    }
}
