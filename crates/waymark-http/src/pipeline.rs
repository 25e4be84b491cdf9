//! Update delivery pipelines.
//!
//! The pipelines are the only layer that converts errors into `on_error`
//! invocations; everything below them returns `Result`.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::watch;
use tracing::{debug, trace};

use waymark_core::error::LocationError;
use waymark_core::{LocationSample, LocationSource, Result, TokenStore};

use crate::api::LocationApiClient;

/// Sampling granularity for a once-shot request. The source decides how it
/// polls; this is the interval it is asked for.
pub const ONCE_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Callback invoked with the reported coordinates on success.
pub type OnUpdate = Arc<dyn Fn(f64, f64) + Send + Sync>;

/// Callback invoked with `(code, message)` on failure.
pub type OnError = Arc<dyn Fn(i32, String) + Send + Sync>;

/// Deliver exactly one sample, invoking exactly one callback.
///
/// Any local failure (source unavailable, stream error, stream ending
/// without a sample) reaches `on_error` with code `-1`; remote failures
/// carry their HTTP status. Terminal after one callback, no retry.
pub async fn deliver_once<L, S>(
    source: &L,
    api: &LocationApiClient<S>,
    on_update: OnUpdate,
    on_error: OnError,
) where
    L: LocationSource,
    S: TokenStore,
{
    match next_sample(source).await {
        Ok(sample) => match api.update_location(&sample).await {
            Ok(_ack) => on_update(sample.latitude, sample.longitude),
            Err(err) => {
                let (code, message) = err.report();
                on_error(code, message);
            }
        },
        Err(err) => {
            let (code, message) = err.report();
            on_error(code, message);
        }
    }
}

async fn next_sample<L: LocationSource>(source: &L) -> Result<LocationSample> {
    let mut stream = source.stream_samples(ONCE_POLL_INTERVAL)?;
    match stream.next().await {
        Some(sample) => sample,
        None => Err(LocationError::Unavailable(
            "location stream ended without a sample".to_string(),
        )
        .into()),
    }
}

/// Deliver every emitted sample until shutdown.
///
/// Each sample's update runs as its own task so a slow request never blocks
/// delivery of the next sample; callbacks for different samples may land
/// out of order. A failed sample or update is reported and the subscription
/// carries on; only shutdown, or the source ending, stops it.
pub async fn deliver_continuous<L, S>(
    source: &L,
    api: LocationApiClient<S>,
    interval: Duration,
    on_update: OnUpdate,
    on_error: OnError,
    mut shutdown: watch::Receiver<bool>,
) where
    L: LocationSource,
    S: TokenStore + 'static,
{
    let mut stream = match source.stream_samples(interval) {
        Ok(stream) => stream,
        Err(err) => {
            let (code, message) = err.report();
            on_error(code, message);
            return;
        }
    };

    loop {
        let next = tokio::select! {
            next = stream.next() => next,
            changed = shutdown.changed() => {
                if shutdown_signaled(changed, &shutdown) {
                    debug!("continuous updates stopping");
                    return;
                }
                continue;
            }
        };

        match next {
            None => {
                debug!("sample stream ended");
                return;
            }
            Some(Err(err)) => {
                let (code, message) = err.report();
                on_error(code, message);
            }
            Some(Ok(sample)) => {
                trace!(
                    lat = sample.latitude,
                    lon = sample.longitude,
                    "sample received"
                );
                spawn_update(
                    api.clone(),
                    sample,
                    Arc::clone(&on_update),
                    Arc::clone(&on_error),
                    shutdown.clone(),
                );
            }
        }
    }
}

/// Run one sample's update as an independent unit of work. Shutdown
/// abandons the request without invoking either callback.
fn spawn_update<S>(
    api: LocationApiClient<S>,
    sample: LocationSample,
    on_update: OnUpdate,
    on_error: OnError,
    mut shutdown: watch::Receiver<bool>,
) where
    S: TokenStore + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            result = api.update_location(&sample) => match result {
                Ok(_ack) => on_update(sample.latitude, sample.longitude),
                Err(err) => {
                    let (code, message) = err.report();
                    on_error(code, message);
                }
            },
            _ = shutdown.changed() => {
                trace!("in-flight update abandoned");
            }
        }
    });
}

/// True when a watch change or channel closure means shutdown.
fn shutdown_signaled(
    changed: std::result::Result<(), watch::error::RecvError>,
    rx: &watch::Receiver<bool>,
) -> bool {
    changed.is_err() || *rx.borrow()
}
