//! Location reporting API client.

use tracing::{debug, instrument};

use waymark_core::error::ApiError;
use waymark_core::{LocationSample, Result, TokenStore, UpdateAck};

use crate::endpoints::{
    LocationUpdateRequest, LocationUpdateResponse, LOCATION, LOCATION_FAILURE_MESSAGE,
};
use crate::transport::AuthedTransport;

/// Sends location samples over the authenticated transport.
pub struct LocationApiClient<S> {
    transport: AuthedTransport<S>,
}

impl<S> Clone for LocationApiClient<S> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<S: TokenStore> LocationApiClient<S> {
    pub fn new(transport: AuthedTransport<S>) -> Self {
        Self { transport }
    }

    /// Report one sample to the service.
    ///
    /// Every non-2xx outcome maps to the same failure message with the
    /// response's status code; a 2xx without a readable acknowledgement
    /// body is also a failure, never a success with an empty payload.
    #[instrument(skip(self), fields(lat = sample.latitude, lon = sample.longitude))]
    pub async fn update_location(&self, sample: &LocationSample) -> Result<UpdateAck> {
        let request = LocationUpdateRequest {
            latitude: sample.latitude,
            longitude: sample.longitude,
        };

        let response = self.transport.post(LOCATION, &request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(status.as_u16(), LOCATION_FAILURE_MESSAGE).into());
        }

        match response.json::<LocationUpdateResponse>().await {
            Ok(body) => {
                debug!("location update acknowledged");
                Ok(UpdateAck {
                    message: body.message,
                })
            }
            Err(_) => Err(ApiError::new(status.as_u16(), LOCATION_FAILURE_MESSAGE).into()),
        }
    }
}
