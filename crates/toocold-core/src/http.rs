//! reqwest-backed [`HttpTransport`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use toocold_core::{HttpTransport, ReqwestTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new(Duration::from_secs(10))?;
//! let response = transport
//!     .get_text("https://air-quality-api.open-meteo.com/v1/air-quality", &[])
//!     .await?;
//! println!("HTTP {}", response.status);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{HttpResponse, HttpTransport, Query, TransportError};

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport built on a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("toocold/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Create a transport with a custom reqwest Client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_text(
        &self,
        url: &str,
        query: &Query,
    ) -> std::result::Result<HttpResponse, TransportError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError {
            url: url.to_string(),
            reason: format!("failed to read body: {}", e),
        })?;
        debug!("{} -> HTTP {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}

/// Check that `url` uses the `http` or `https` scheme.
///
/// Surrounding whitespace is dropped; the rest of the URL, including any
/// trailing slash, is returned as given.
pub fn validate_url(url: &str) -> Result<String> {
    let url = url.trim();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            url
        )));
    }

    Ok(url.to_string())
}
