//! Unified error types for the Teamchat client.
//!
//! The taxonomy mirrors the failure channels of the API layer:
//!
//! | Type | When | Surfaced as |
//! |------|------|-------------|
//! | [`ConfigError`] | Invalid/missing configuration field | `Err` from construction, before any network call |
//! | [`ValidationError`] | Missing/empty required parameter | `Err` from the operation, before any network call |
//! | [`ApiError`] | The bot API rejected the call, or the response was unusable | `Err` value from every operation |
//! | [`NetworkError`] | Transport fault (DNS, refused connection, timeout) | Wrapped in [`ApiError::Network`], distinguishable from API rejection |
//!
//! Event-decoding failures are **not** errors in this taxonomy; they are the
//! `DecodeError` variant of the event sum type so that one malformed event
//! never aborts a batch.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while validating a resolved configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The bot token is missing or empty.
    #[error("bot token must not be empty")]
    MissingToken,

    /// A configuration field has an invalid value.
    #[error("invalid configuration field '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Reason for rejection.
        reason: String,
    },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised while validating operation arguments.
///
/// Always detected before any network request is issued.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required parameter is missing or empty.
    #[error("missing required parameter: {field}")]
    MissingParameter {
        /// The parameter name as it appears on the wire.
        field: &'static str,
    },
}

// =============================================================================
// Network Errors
// =============================================================================

/// Transport-level failures, distinct from API-level rejection.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other I/O-level failure.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type returned as a value from every API operation.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// A required argument failed validation; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API answered 200 but reported failure (`ok: false` / `error`).
    #[error("API rejected the call: {description}")]
    Rejected {
        /// Human-readable description from the response body.
        description: String,
        /// Raw response body, preserved for diagnostics but kept out of
        /// the display message.
        body: String,
    },

    /// The API answered with a non-200 status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The API answered 200 but the body was not valid JSON.
    ///
    /// The raw body is kept for diagnostics but deliberately excluded from
    /// the display message so malformed or binary payloads do not leak into
    /// logs by default.
    #[error("failed to parse response")]
    InvalidResponse {
        /// Raw response body, preserved for explicit inspection.
        body: String,
    },

    /// The network was unreachable; no API-level answer was received.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The call was cancelled by the caller before completion.
    #[error("call cancelled")]
    Cancelled,

    /// Failed to serialize parameters or deserialize a result value.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
