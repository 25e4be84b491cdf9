//! Token types for authenticated API access.

use std::fmt;

/// An access token for authenticated API requests.
///
/// Access tokens are short-lived credentials attached as a bearer header
/// to every API call.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
///
/// Refresh tokens are longer-lived and used to obtain new access tokens
/// without re-authenticating with the API key.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh requests.
    ///
    /// # Security
    ///
    /// Use only when constructing token refresh requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// The credential triple held for an authenticated session.
///
/// A `TokenSet` always carries all three fields; "unauthenticated" is
/// represented as the absence of a set (`Option<TokenSet>` at the store
/// boundary), so a partially-populated triple cannot exist.
///
/// `expires_at` is the server-supplied expiry timestamp, stored verbatim.
#[derive(Clone)]
pub struct TokenSet {
    access_token: AccessToken,
    refresh_token: RefreshToken,
    expires_at: String,
}

impl TokenSet {
    /// Create a new token set.
    pub fn new(
        access_token: AccessToken,
        refresh_token: RefreshToken,
        expires_at: impl Into<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: expires_at.into(),
        }
    }

    /// Returns the access token.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the refresh token.
    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }

    /// Returns the expiry timestamp as supplied by the server.
    pub fn expires_at(&self) -> &str {
        &self.expires_at
    }

    /// Returns a new set with a rotated access token and expiry.
    ///
    /// The refresh token is retained; a refresh rotates only the
    /// short-lived half of the triple.
    pub fn with_rotated_access(
        &self,
        access_token: AccessToken,
        expires_at: impl Into<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token: self.refresh_token.clone(),
            expires_at: expires_at.into(),
        }
    }
}

// Custom Debug impl that hides sensitive data
impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
