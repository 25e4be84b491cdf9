//! Authenticated transport with transparent refresh-and-retry.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use waymark_core::error::AuthError;
use waymark_core::{Result, TokenStore};

use crate::client::RestClient;
use crate::refresh::TokenRefresher;

/// Wraps the HTTP client, attaching the current access token to every
/// request and recovering from an authorization failure exactly once.
///
/// Per request: one or two underlying sends, zero or one refresh, never
/// more. A server that rejects even rotated tokens cannot loop us.
pub struct AuthedTransport<S> {
    rest: RestClient,
    store: Arc<S>,
    refresher: Arc<TokenRefresher<S>>,
}

// Manual Clone so `S` itself need not be Clone.
impl<S> Clone for AuthedTransport<S> {
    fn clone(&self) -> Self {
        Self {
            rest: self.rest.clone(),
            store: Arc::clone(&self.store),
            refresher: Arc::clone(&self.refresher),
        }
    }
}

impl<S: TokenStore> AuthedTransport<S> {
    pub fn new(rest: RestClient, store: Arc<S>, refresher: Arc<TokenRefresher<S>>) -> Self {
        Self {
            rest,
            store,
            refresher,
        }
    }

    /// Send an authenticated POST.
    ///
    /// On a 401/403 response the refresher runs once; if it succeeds the
    /// request is rebuilt with the rotated token and sent once more, and
    /// that second response is returned whatever its status. If the refresh
    /// fails, the original authorization-failure response is returned
    /// unmodified.
    #[instrument(skip(self, body))]
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<reqwest::Response>
    where
        B: Serialize + std::fmt::Debug,
    {
        let token = self
            .store
            .load()
            .ok_or(AuthError::NotAuthenticated)?
            .access_token()
            .clone();

        let response = self.rest.post_bearer_json(path, body, token.as_str()).await?;

        if !is_auth_failure(response.status()) {
            return Ok(response);
        }

        debug!(
            status = response.status().as_u16(),
            "authorization failure, attempting token refresh"
        );

        match self.refresher.refresh().await {
            Ok(rotated) => self.rest.post_bearer_json(path, body, rotated.as_str()).await,
            Err(err) => {
                warn!(error = %err, "token refresh failed, surfacing original response");
                Ok(response)
            }
        }
    }
}

/// Status codes treated as an authorization failure worth a refresh.
fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status.as_u16(), 401 | 403)
}
