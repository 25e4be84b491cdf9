//! Error types for the waymark SDK.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, transport, authentication, remote API, and location
//! sampling failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for waymark operations.
///
/// This error type covers all possible failure modes in the SDK, with
/// explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (blank API key, invalid base URL).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing tokens, rejected refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Remote API errors (non-2xx responses, unusable bodies).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Location sampling errors (missing permission, no provider).
    #[error("location error: {0}")]
    Location(#[from] LocationError),
}

impl Error {
    /// Numeric code reported to error callbacks: the HTTP status for remote
    /// API failures, `-1` for everything local.
    pub fn code(&self) -> i32 {
        match self {
            Error::Api(api) => i32::from(api.status),
            _ => -1,
        }
    }

    /// Splits into the `(code, message)` pair delivered to error callbacks.
    ///
    /// Remote and location failures report their raw message; other local
    /// failures report their full rendering.
    pub fn report(&self) -> (i32, String) {
        match self {
            Error::Api(api) => (i32::from(api.status), api.message.clone()),
            Error::Location(LocationError::Unavailable(message)) => (-1, message.clone()),
            Error::Config(config) => (-1, config.to_string()),
            Error::Transport(transport) => (-1, transport.to_string()),
            Error::Auth(auth) => (-1, auth.to_string()),
        }
    }
}

/// Configuration errors, raised before any network traffic.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API key was blank or whitespace-only.
    #[error("API key cannot be blank")]
    BlankApiKey,

    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed: {host}")]
    Dns { host: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token set is stored; the session never authenticated.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Refresh token is invalid or expired.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,

    /// The refresh endpoint rejected the stored refresh token.
    #[error("token refresh rejected with HTTP {status}")]
    RefreshRejected { status: u16 },
}

/// An error response from the remote API.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error message, from the server body when it supplied one.
    pub message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Check if this is an authorization failure the transport may recover
    /// from by refreshing the access token.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Location sampling errors.
#[derive(Debug, Error)]
pub enum LocationError {
    /// No sample can be produced: permission missing, positioning disabled,
    /// or the source ended unexpectedly. Carries the source's own message.
    #[error("{0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_reports_status_and_message() {
        let err = Error::from(ApiError::new(500, "Failed to update location"));
        assert_eq!(err.code(), 500);
        assert_eq!(err.report(), (500, "Failed to update location".to_string()));
    }

    #[test]
    fn location_error_reports_raw_message() {
        let err = Error::from(LocationError::Unavailable("GPS is disabled".to_string()));
        assert_eq!(err.code(), -1);
        assert_eq!(err.report(), (-1, "GPS is disabled".to_string()));
    }

    #[test]
    fn transport_error_reports_minus_one() {
        let err = Error::from(TransportError::Connection {
            message: "connection refused".to_string(),
        });
        let (code, message) = err.report();
        assert_eq!(code, -1);
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn auth_failure_statuses() {
        assert!(ApiError::new(401, "x").is_auth_error());
        assert!(ApiError::new(403, "x").is_auth_error());
        assert!(!ApiError::new(500, "x").is_auth_error());
        assert!(!ApiError::new(200, "x").is_auth_error());
    }
}
