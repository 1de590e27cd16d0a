//! Error types for toocold-core.
//!
//! This module defines the error taxonomy of the aggregation pipeline.
//!
//! # Propagation Policy
//!
//! Per-source failures never travel past the fetcher that produced them. Each
//! fetcher converts its [`SourceError`] into a [`SourceStatus`] plus a safe
//! fallback value:
//!
//! | Error | Status | Indoor fallback | Weather / air-quality fallback |
//! |-------|--------|-----------------|--------------------------------|
//! | [`SourceError::Misconfigured`] | `DEMO` | synthetic series | absent |
//! | [`SourceError::Unavailable`] | `ERROR` | synthetic series | absent |
//! | [`SourceError::HttpStatus`] | `ERROR` | synthetic series | absent |
//! | [`SourceError::Malformed`] | `ERROR` | synthetic series | absent |
//!
//! Only a failure of the refresh cycle itself surfaces as [`Error::RefreshFailed`],
//! which the orchestrator turns into an offline connectivity state.
//!
//! [`Error::EmptyDataSet`] is returned by the statistics reducer when a time
//! window holds no readings; callers render a placeholder.

use thiserror::Error;

use toocold_types::SourceStatus;

use crate::config::ValidationError;
use crate::sources::SourceKind;

/// A failure of a single data source.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The source is not configured, or its endpoint is a placeholder.
    #[error("{kind} source not configured: {reason}")]
    Misconfigured {
        /// Which source.
        kind: SourceKind,
        /// Why the configuration was rejected.
        reason: String,
    },

    /// The request did not complete (DNS, connect, timeout, TLS).
    #[error("{kind} source unreachable at {url}: {reason}")]
    Unavailable {
        /// Which source.
        kind: SourceKind,
        /// The requested URL.
        url: String,
        /// Transport error description.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("{kind} source returned HTTP {status} for {url}")]
    HttpStatus {
        /// Which source.
        kind: SourceKind,
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The payload did not have the expected shape.
    #[error("{kind} source returned a malformed payload: {reason}")]
    Malformed {
        /// Which source.
        kind: SourceKind,
        /// Parser error description.
        reason: String,
    },
}

impl SourceError {
    /// The source this error belongs to.
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceError::Misconfigured { kind, .. }
            | SourceError::Unavailable { kind, .. }
            | SourceError::HttpStatus { kind, .. }
            | SourceError::Malformed { kind, .. } => *kind,
        }
    }

    /// The status indicator a fetcher reports after this error.
    ///
    /// Misconfiguration selects demo mode; everything else is an error.
    pub fn status(&self) -> SourceStatus {
        match self {
            SourceError::Misconfigured { .. } => SourceStatus::Demo,
            _ => SourceStatus::Error,
        }
    }
}

/// Errors surfaced by toocold-core.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The selected window contains no readings.
    #[error("No readings in the selected time range")]
    EmptyDataSet,

    /// The refresh cycle itself failed; no snapshot was produced.
    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    /// The configuration did not pass validation.
    #[error("Invalid configuration:\n{}", format_validation_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// A URL was rejected before any request was made.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias using toocold-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
