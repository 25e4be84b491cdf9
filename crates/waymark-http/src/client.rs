//! HTTP client implementation.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, instrument, trace};

use waymark_core::error::TransportError;
use waymark_core::{ApiUrl, Error, Result};

use crate::endpoints::ApiErrorResponse;

/// HTTP client for API requests.
///
/// Responses are returned raw; status interpretation belongs to the layers
/// above (the transport decides about 401/403, the API clients about the
/// rest).
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base: ApiUrl,
}

impl RestClient {
    /// Create a new client for the given API base URL.
    pub fn new(base: ApiUrl) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("waymark/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self { client, base }
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    /// Make a bearer-authorized POST with no body.
    /// Used for `/auth` and `/auth/refresh`, which carry their credential in
    /// the Authorization header.
    #[instrument(skip(self, token), fields(base = %self.base))]
    pub async fn post_bearer(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        let url = self.base.endpoint_url(path);
        debug!(path, "POST");

        self.client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await
            .map_err(transport_error)
    }

    /// Make a bearer-authorized POST with a JSON body.
    #[instrument(skip(self, body, token), fields(base = %self.base))]
    pub async fn post_bearer_json<B>(
        &self,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + std::fmt::Debug,
    {
        let url = self.base.endpoint_url(path);
        debug!(path, "POST");
        trace!(?body, "request body");

        self.client
            .post(&url)
            .json(body)
            .headers(self.auth_headers(token))
            .send()
            .await
            .map_err(transport_error)
    }

    /// Create authorization headers for authenticated requests.
    fn auth_headers(&self, token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).expect("invalid token characters"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Read the server's error message from a failed response, if it sent
    /// a parseable one.
    pub async fn error_message(response: reqwest::Response) -> Option<String> {
        response
            .json::<ApiErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
    }
}

/// Map reqwest failures into the transport error taxonomy.
pub fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout { duration_ms: 0 }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let base = ApiUrl::new("https://api.example.com").unwrap();
        let client = RestClient::new(base.clone());
        assert_eq!(client.base().as_str(), base.as_str());
    }
}
