//! Error types for data parsing in toocold-types.

use thiserror::Error;

/// Errors that can occur when parsing dashboard data.
///
/// This error type is transport-agnostic and does not include
/// HTTP-specific errors (those belong in toocold-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The time range selector is not one of the supported values.
    #[error("Unknown time range '{0}' (expected one of 1h, 3h, 6h, 12h, 24h, 1w)")]
    UnknownTimeRange(String),

    /// A timestamp label could not be parsed.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Result type alias using toocold-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
