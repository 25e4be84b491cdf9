//! Location source trait and sample stream.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_core::Stream;

use crate::types::LocationSample;
use crate::Result;

/// A stream of location samples.
///
/// The stream is infinite until dropped; individual items may be errors
/// (e.g. positioning became unavailable mid-stream) without terminating it.
pub struct SampleStream {
    inner: Pin<Box<dyn Stream<Item = Result<LocationSample>> + Send>>,
}

impl SampleStream {
    /// Wrap a stream of samples.
    pub fn new(stream: impl Stream<Item = Result<LocationSample>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for SampleStream {
    type Item = Result<LocationSample>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for SampleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleStream").finish_non_exhaustive()
    }
}

/// A positioning mechanism that produces location samples on demand.
///
/// Implementations are external to the SDK core (GPS hardware, a network
/// positioning service, a simulation). Each call starts a fresh stream.
pub trait LocationSource: Send + Sync {
    /// Begin streaming samples at the given interval.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Unavailable`](crate::error::LocationError)
    /// when no sample can be produced, e.g. a missing permission or no
    /// enabled positioning provider.
    fn stream_samples(&self, interval: Duration) -> Result<SampleStream>;
}
