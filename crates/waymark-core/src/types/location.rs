//! Location values.

use serde::{Deserialize, Serialize};

/// One location reading produced by a [`LocationSource`](crate::LocationSource).
///
/// Samples are immutable values; each one is consumed by at most one
/// update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl LocationSample {
    /// Create a new sample.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The server's acknowledgement of a successful location update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAck {
    /// Acknowledgement message from the server.
    pub message: String,
}
