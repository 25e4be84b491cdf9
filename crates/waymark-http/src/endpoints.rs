//! REST endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// POST /auth: exchange an API key for a token set.
pub const AUTH: &str = "/auth";

/// POST /auth/refresh: exchange a refresh token for a new access token.
pub const AUTH_REFRESH: &str = "/auth/refresh";

/// POST /location: report one location sample.
pub const LOCATION: &str = "/location";

// ============================================================================
// Failure Messages
// ============================================================================

/// Fallback when `/auth` fails without a server-supplied message.
pub const AUTH_FAILURE_MESSAGE: &str = "Failed to authenticate";

/// Reported for every `/location` failure.
pub const LOCATION_FAILURE_MESSAGE: &str = "Failed to update location";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response from `/auth`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_at: String,
    pub refresh_token: String,
}

/// Response from `/auth/refresh`.
/// Note: the refresh token is in the Authorization header and is not rotated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_at: String,
}

/// Request body for `/location`.
#[derive(Debug, Serialize)]
pub struct LocationUpdateRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response from `/location`.
#[derive(Debug, Deserialize)]
pub struct LocationUpdateResponse {
    pub message: String,
}

/// Error response body shape.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: Option<String>,
}
