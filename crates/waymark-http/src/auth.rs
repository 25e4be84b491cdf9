//! Initial API-key authentication.

use tracing::{debug, info, instrument};

use waymark_core::error::{ApiError, ConfigError};
use waymark_core::{AccessToken, ApiKey, RefreshToken, Result, TokenSet};

use crate::client::{transport_error, RestClient};
use crate::endpoints::{AuthResponse, AUTH, AUTH_FAILURE_MESSAGE};

/// Exchanges an API key for an initial token set.
#[derive(Debug, Clone)]
pub struct AuthClient {
    rest: RestClient,
}

impl AuthClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Authenticate with the service.
    ///
    /// A blank key fails locally, before any request is made. The returned
    /// tokens are not persisted here; the caller owns that side effect.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, api_key: &ApiKey) -> Result<TokenSet> {
        if api_key.is_blank() {
            return Err(ConfigError::BlankApiKey.into());
        }

        info!("Authenticating with API key");
        let response = self.rest.post_bearer(AUTH, api_key.as_str()).await?;

        let status = response.status();
        if !status.is_success() {
            let message = RestClient::error_message(response)
                .await
                .unwrap_or_else(|| AUTH_FAILURE_MESSAGE.to_string());
            return Err(ApiError::new(status.as_u16(), message).into());
        }

        let body: AuthResponse = response.json().await.map_err(transport_error)?;
        debug!("Authentication succeeded");

        Ok(TokenSet::new(
            AccessToken::new(body.access_token),
            RefreshToken::new(body.refresh_token),
            body.expires_at,
        ))
    }
}
