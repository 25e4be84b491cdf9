//! Session facade: the composition root for one SDK instance.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, instrument};

use waymark_core::{ApiKey, ApiUrl, LocationSource, Result, TokenStore};

use crate::api::LocationApiClient;
use crate::auth::AuthClient;
use crate::client::RestClient;
use crate::pipeline::{self, OnError, OnUpdate};
use crate::refresh::TokenRefresher;
use crate::transport::AuthedTransport;

/// Configuration for [`Session::initialize`].
#[derive(Debug, Clone)]
pub struct Config {
    api_url: ApiUrl,
    api_key: ApiKey,
    enable_logging: bool,
}

impl Config {
    pub fn new(api_url: ApiUrl, api_key: ApiKey) -> Self {
        Self {
            api_url,
            api_key,
            enable_logging: false,
        }
    }

    /// Install a default console `tracing` subscriber during `initialize`.
    ///
    /// A subscriber the host application installed earlier always wins;
    /// the install is best-effort.
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }
}

/// One initialized SDK instance.
///
/// A `Session` is an explicitly constructed, caller-owned handle; there is
/// no process-global instance. It is cheap to clone (internal `Arc`), and
/// all clones share one task group: live from [`Session::initialize`] until
/// [`Session::destroy`], after which every operation is a no-op.
///
/// Dropping the last handle closes the shutdown channel, which workers
/// treat the same as `destroy`.
pub struct Session<L, S> {
    inner: Arc<SessionInner<L, S>>,
}

impl<L, S> Clone for Session<L, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SessionInner<L, S> {
    api: LocationApiClient<S>,
    source: Arc<L>,
    api_url: ApiUrl,
    shutdown: watch::Sender<bool>,
    destroyed: AtomicBool,
}

impl<L, S> Session<L, S>
where
    L: LocationSource + 'static,
    S: TokenStore + 'static,
{
    /// Authenticate and build a ready session.
    ///
    /// Fails fast on a blank API key, before any network traffic, and fails
    /// on a rejected initial authentication. On success the token triple is
    /// persisted to `store` and the session is ready for update requests.
    #[instrument(skip_all, fields(api_url = %config.api_url))]
    pub async fn initialize(config: Config, source: L, store: S) -> Result<Self> {
        if config.enable_logging {
            let _ = tracing_subscriber::fmt().try_init();
        }

        let store = Arc::new(store);
        let rest = RestClient::new(config.api_url.clone());

        let tokens = AuthClient::new(rest.clone())
            .authenticate(&config.api_key)
            .await?;
        store.save(&tokens);
        info!("session initialized");

        let refresher = Arc::new(TokenRefresher::new(rest.clone(), Arc::clone(&store)));
        let transport = AuthedTransport::new(rest, store, refresher);
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(SessionInner {
                api: LocationApiClient::new(transport),
                source: Arc::new(source),
                api_url: config.api_url,
                shutdown,
                destroyed: AtomicBool::new(false),
            }),
        })
    }

    /// Report the current location once.
    ///
    /// Pulls a single sample, sends it, and invokes exactly one of the two
    /// callbacks, asynchronously and never inline with this call. Destroying
    /// the session first abandons the request without a callback. No-op on
    /// a destroyed session.
    pub fn request_once(
        &self,
        on_update: impl Fn(f64, f64) + Send + Sync + 'static,
        on_error: impl Fn(i32, String) + Send + Sync + 'static,
    ) {
        if self.is_destroyed() {
            debug!("request_once on destroyed session ignored");
            return;
        }

        let source = Arc::clone(&self.inner.source);
        let api = self.inner.api.clone();
        let on_update: OnUpdate = Arc::new(on_update);
        let on_error: OnError = Arc::new(on_error);
        let mut shutdown = self.inner.shutdown.subscribe();

        tokio::spawn(async move {
            tokio::select! {
                _ = pipeline::deliver_once(&*source, &api, on_update, on_error) => {}
                _ = shutdown.changed() => debug!("once-shot request abandoned"),
            }
        });
    }

    /// Report the location repeatedly at `interval` until [`Session::destroy`].
    ///
    /// Every emitted sample gets its own update attempt and its own
    /// callback; per-sample failures do not end the subscription. No-op on
    /// a destroyed session.
    pub fn enable_continuous(
        &self,
        interval: Duration,
        on_update: impl Fn(f64, f64) + Send + Sync + 'static,
        on_error: impl Fn(i32, String) + Send + Sync + 'static,
    ) {
        if self.is_destroyed() {
            debug!("enable_continuous on destroyed session ignored");
            return;
        }

        let source = Arc::clone(&self.inner.source);
        let api = self.inner.api.clone();
        let on_update: OnUpdate = Arc::new(on_update);
        let on_error: OnError = Arc::new(on_error);
        let shutdown = self.inner.shutdown.subscribe();

        tokio::spawn(async move {
            pipeline::deliver_continuous(&*source, api, interval, on_update, on_error, shutdown)
                .await;
        });
    }

    /// Cancel all outstanding subscriptions and in-flight work and retire
    /// the session. Safe to call any number of times.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("session destroyed");
        let _ = self.inner.shutdown.send(true);
    }

    fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }
}

// Custom Debug impl: the inner clients hold credentials.
impl<L, S> fmt::Debug for Session<L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api_url", &self.inner.api_url)
            .field("destroyed", &self.inner.destroyed.load(Ordering::SeqCst))
            .finish()
    }
}
