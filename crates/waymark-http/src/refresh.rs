//! Access-token refresh with single-flight coalescing.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use waymark_core::error::AuthError;
use waymark_core::{AccessToken, Result, TokenStore};

use crate::client::{transport_error, RestClient};
use crate::endpoints::{RefreshResponse, AUTH_REFRESH};

/// Exchanges the stored refresh token for a new access token.
///
/// Concurrent refreshes are coalesced: the gate serializes callers, and a
/// caller that finds the access token already rotated while it waited
/// returns the rotated token without issuing its own request. A burst of
/// authorization failures therefore produces exactly one refresh call.
pub struct TokenRefresher<S> {
    rest: RestClient,
    store: Arc<S>,
    gate: Mutex<()>,
}

impl<S: TokenStore> TokenRefresher<S> {
    pub fn new(rest: RestClient, store: Arc<S>) -> Self {
        Self {
            rest,
            store,
            gate: Mutex::new(()),
        }
    }

    /// Refresh the access token, returning the token now in effect.
    ///
    /// On success the store receives the rotated access token and expiry;
    /// the refresh token is retained. On failure the store is untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<AccessToken> {
        let stale = self.store.load().ok_or(AuthError::NotAuthenticated)?;

        let _gate = self.gate.lock().await;

        // Another task may have finished a refresh while we waited on the
        // gate; its rotation is the result we would have produced.
        if let Some(current) = self.store.load() {
            if current.access_token().as_str() != stale.access_token().as_str() {
                debug!("access token already rotated by a concurrent refresh");
                return Ok(current.access_token().clone());
            }
        }

        info!("Refreshing access token");
        let response = self
            .rest
            .post_bearer(AUTH_REFRESH, stale.refresh_token().as_str())
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "token refresh rejected");
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
            }
            .into());
        }

        let body: RefreshResponse = response.json().await.map_err(transport_error)?;
        let access = AccessToken::new(body.access_token);
        self.store
            .save(&stale.with_rotated_access(access.clone(), body.expires_at));
        debug!("access token rotated");

        Ok(access)
    }
}
