//! Mock transport implementation for testing.
//!
//! This module provides a mock HTTP transport that can be used for unit and
//! integration testing without any network access.
//!
//! The [`MockTransport`] implements the [`HttpTransport`] trait, allowing it to
//! be used interchangeably with [`ReqwestTransport`](crate::ReqwestTransport)
//! in the fetchers and the aggregator.
//!
//! # Features
//!
//! - **Routing**: Responses are registered per URL (query string ignored)
//! - **One-shot replies**: Queue replies that are consumed before the standing one
//! - **Failure injection**: Simulate transport errors and panics
//! - **Latency simulation**: Add artificial delays to every request
//! - **Request log**: Inspect which URLs and query parameters were requested

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::traits::{HttpResponse, HttpTransport, Query, TransportError};

/// What the mock does when a URL is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this response.
    Respond(HttpResponse),
    /// Fail as if the network were down.
    Fail(String),
    /// Panic inside the request future.
    Panic(String),
}

/// A request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// The requested URL without query string.
    pub url: String,
    /// Query parameters in request order.
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Look up a query parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct Route {
    queued: VecDeque<MockReply>,
    standing: Option<MockReply>,
}

/// A mock HTTP transport for testing.
///
/// Implements [`HttpTransport`] for use in generic code and testing.
///
/// # Example
///
/// ```
/// use toocold_core::{HttpTransport, MockTransport};
///
/// #[tokio::main]
/// async fn main() {
///     let transport = MockTransport::new();
///     transport.respond("https://feed.example.com", 200, "[]").await;
///
///     let response = transport.get_text("https://feed.example.com", &[]).await.unwrap();
///     assert_eq!(response.body, "[]");
///     assert_eq!(transport.request_count().await, 1);
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: RwLock<HashMap<String, Route>>,
    requests: RwLock<Vec<RecordedRequest>>,
    /// Simulated latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
}

impl MockTransport {
    /// Create a mock with no routes. Unrouted URLs fail with a transport error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the standing response for `url`.
    pub async fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
        self.set_standing(url, MockReply::Respond(HttpResponse::new(status, body)))
            .await;
    }

    /// Make every request to `url` fail with a transport error.
    pub async fn fail(&self, url: &str, reason: &str) {
        self.set_standing(url, MockReply::Fail(reason.to_string()))
            .await;
    }

    /// Make every request to `url` panic.
    pub async fn panic_on(&self, url: &str, message: &str) {
        self.set_standing(url, MockReply::Panic(message.to_string()))
            .await;
    }

    /// Queue a one-shot reply for `url`, consumed before the standing reply.
    pub async fn push_reply(&self, url: &str, reply: MockReply) {
        let mut routes = self.routes.write().await;
        routes.entry(url.to_string()).or_default().queued.push_back(reply);
    }

    /// Remove every route and recorded request.
    pub async fn reset(&self) {
        self.routes.write().await.clear();
        self.requests.write().await.clear();
    }

    /// Add simulated latency to every request.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// All requests seen so far, in arrival order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Requests made to `url`.
    pub async fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }

    /// Number of requests seen so far.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    async fn set_standing(&self, url: &str, reply: MockReply) {
        let mut routes = self.routes.write().await;
        routes.entry(url.to_string()).or_default().standing = Some(reply);
    }

    async fn next_reply(&self, url: &str) -> Option<MockReply> {
        let mut routes = self.routes.write().await;
        let route = routes.get_mut(url)?;
        route.queued.pop_front().or_else(|| route.standing.clone())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get_text(
        &self,
        url: &str,
        query: &Query,
    ) -> std::result::Result<HttpResponse, TransportError> {
        self.requests.write().await.push(RecordedRequest {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        match self.next_reply(url).await {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(reason)) => Err(TransportError {
                url: url.to_string(),
                reason,
            }),
            Some(MockReply::Panic(message)) => panic!("{}", message),
            None => Err(TransportError {
                url: url.to_string(),
                reason: "no mock route registered".to_string(),
            }),
        }
    }
}
