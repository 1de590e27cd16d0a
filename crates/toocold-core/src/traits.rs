//! Trait abstraction for the HTTP layer.
//!
//! The fetchers only ever issue plain GET requests and interpret the body
//! themselves, so the [`HttpTransport`] trait is deliberately small. It lets
//! the same fetcher code run against [`ReqwestTransport`](crate::ReqwestTransport)
//! in production and [`MockTransport`](crate::MockTransport) in tests.

use async_trait::async_trait;
use thiserror::Error;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {url} failed: {reason}")]
pub struct TransportError {
    /// The requested URL.
    pub url: String,
    /// What went wrong.
    pub reason: String,
}

/// Query parameters as key/value pairs, in request order.
pub type Query = [(&'static str, String)];

/// Trait abstracting the HTTP GET operation used by the fetchers.
///
/// # Example
///
/// ```ignore
/// use toocold_core::{HttpTransport, Result};
///
/// async fn body_len<T: HttpTransport>(transport: &T) -> usize {
///     match transport.get_text("https://example.com", &[]).await {
///         Ok(resp) => resp.body.len(),
///         Err(_) => 0,
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request and return the status and body.
    ///
    /// Non-2xx statuses are returned as responses, not errors. Only failures
    /// that prevent a response (DNS, connect, timeout, TLS, body read) are
    /// reported as [`TransportError`].
    async fn get_text(
        &self,
        url: &str,
        query: &Query,
    ) -> std::result::Result<HttpResponse, TransportError>;
}
