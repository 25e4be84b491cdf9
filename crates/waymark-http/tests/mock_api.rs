//! Mock API tests for the waymark session and pipelines.
//!
//! These tests use wiremock to simulate the location service and test the
//! SDK's behavior without requiring network access or real credentials.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::timeout;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use waymark_core::error::LocationError;
use waymark_core::{
    ApiKey, ApiUrl, LocationSample, LocationSource, MemoryTokenStore, Result, SampleStream,
    TokenStore,
};
use waymark_http::{Config, Session};

/// Helper to create an API URL from a mock server.
fn mock_api_url(server: &MockServer) -> ApiUrl {
    // For tests, we need to allow HTTP localhost
    ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn config_for(server: &MockServer) -> Config {
    Config::new(mock_api_url(server), ApiKey::new("test-api-key"))
}

/// Mount a successful `/auth` exchange for the test API key.
async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(header("authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-1",
            "expiresAt": "2024-05-01T00:00:00Z",
            "refreshToken": "refresh-1"
        })))
        .mount(server)
        .await;
}

/// A source that emits the same coordinates at the requested interval.
struct FixedSource {
    latitude: f64,
    longitude: f64,
}

impl LocationSource for FixedSource {
    fn stream_samples(&self, interval: Duration) -> Result<SampleStream> {
        let (latitude, longitude) = (self.latitude, self.longitude);
        Ok(SampleStream::new(async_stream::stream! {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                yield Ok(LocationSample::new(latitude, longitude));
            }
        }))
    }
}

/// A source with no positioning available.
struct UnavailableSource(&'static str);

impl LocationSource for UnavailableSource {
    fn stream_samples(&self, _interval: Duration) -> Result<SampleStream> {
        Err(LocationError::Unavailable(self.0.to_string()).into())
    }
}

/// Callback outcomes funneled into one channel, preserving arrival order.
#[derive(Debug, PartialEq)]
enum Event {
    Update(f64, f64),
    Error(i32, String),
}

fn channel_callbacks() -> (
    impl Fn(f64, f64) + Send + Sync + 'static,
    impl Fn(i32, String) + Send + Sync + 'static,
    mpsc::UnboundedReceiver<Event>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let update_tx = tx.clone();
    (
        move |lat, lon| {
            let _ = update_tx.send(Event::Update(lat, lon));
        },
        move |code, message| {
            let _ = tx.send(Event::Error(code, message));
        },
        rx,
    )
}

async fn recv_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a callback")
        .expect("callback channel closed")
}

async fn assert_no_more_events(rx: &mut mpsc::UnboundedReceiver<Event>) {
    match timeout(Duration::from_millis(200), rx.recv()).await {
        // Quiet for the whole window, or closed: nothing can arrive anymore.
        Err(_elapsed) => {}
        Ok(None) => {}
        Ok(Some(event)) => panic!("unexpected extra callback: {:?}", event),
    }
}

// ============================================================================
// Initialization Tests
// ============================================================================

#[tokio::test]
async fn initialize_persists_token_triple() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    let store = Arc::new(MemoryTokenStore::new());
    Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 0.0,
            longitude: 0.0,
        },
        Arc::clone(&store),
    )
    .await
    .unwrap();

    let tokens = store.load().expect("tokens should be persisted");
    assert_eq!(tokens.access_token().as_str(), "access-1");
    assert_eq!(tokens.refresh_token().as_str(), "refresh-1");
    assert_eq!(tokens.expires_at(), "2024-05-01T00:00:00Z");
}

#[tokio::test]
async fn blank_api_key_fails_before_any_network_call() {
    let server = MockServer::start().await;

    for key in ["", "   ", "\t\n"] {
        let config = Config::new(mock_api_url(&server), ApiKey::new(key));
        let result = Session::initialize(
            config,
            FixedSource {
                latitude: 0.0,
                longitude: 0.0,
            },
            MemoryTokenStore::new(),
        )
        .await;

        assert!(matches!(
            result.unwrap_err(),
            waymark_core::Error::Config(_)
        ));
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn initialize_surfaces_server_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "unknown API key"
        })))
        .mount(&server)
        .await;

    let err = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 0.0,
            longitude: 0.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.report(), (401, "unknown API key".to_string()));
}

#[tokio::test]
async fn initialize_falls_back_to_default_auth_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 0.0,
            longitude: 0.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.report(), (503, "Failed to authenticate".to_string()));
}

// ============================================================================
// Once-Shot Pipeline Tests
// ============================================================================

#[tokio::test]
async fn request_once_reports_sample_coordinates_on_success() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/location"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_json(json!({
            "latitude": 37.42,
            "longitude": -122.08
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 37.42,
            longitude: -122.08,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    assert_eq!(recv_event(&mut rx).await, Event::Update(37.42, -122.08));
    assert_no_more_events(&mut rx).await;
}

#[tokio::test]
async fn request_once_reports_server_failure_exactly_once() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 1.0,
            longitude: 2.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    assert_eq!(
        recv_event(&mut rx).await,
        Event::Error(500, "Failed to update location".to_string())
    );
    assert_no_more_events(&mut rx).await;
}

#[tokio::test]
async fn request_once_funnels_source_failure_to_error_callback() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    let session = Session::initialize(
        config_for(&server),
        UnavailableSource("GPS is disabled"),
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    assert_eq!(
        recv_event(&mut rx).await,
        Event::Error(-1, "GPS is disabled".to_string())
    );
    assert_no_more_events(&mut rx).await;

    // Only /auth ever reached the server.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn request_once_reports_unparseable_ack_as_failure() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/location"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("not json")
                .insert_header("content-type", "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 1.0,
            longitude: 2.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    assert_eq!(
        recv_event(&mut rx).await,
        Event::Error(200, "Failed to update location".to_string())
    );
}

// ============================================================================
// Refresh-and-Retry Transport Tests
// ============================================================================

#[tokio::test]
async fn auth_failure_triggers_one_refresh_and_one_retry() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    // First attempt with the initial token is rejected.
    Mock::given(method("POST"))
        .and(path("/location"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("authorization", "Bearer refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-2",
            "expiresAt": "2024-05-01T01:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The retry with the rotated token succeeds; the caller sees this one.
    Mock::given(method("POST"))
        .and(path("/location"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 37.42,
            longitude: -122.08,
        },
        Arc::clone(&store),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    assert_eq!(recv_event(&mut rx).await, Event::Update(37.42, -122.08));

    // The rotation is persisted, the refresh token retained.
    let tokens = store.load().unwrap();
    assert_eq!(tokens.access_token().as_str(), "access-2");
    assert_eq!(tokens.refresh_token().as_str(), "refresh-1");
}

#[tokio::test]
async fn failed_refresh_surfaces_original_authorization_failure() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    // Exactly one send: the rejected attempt. No retry without new tokens.
    Mock::given(method("POST"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 1.0,
            longitude: 2.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    // The caller observes the original 403, not the refresh failure.
    assert_eq!(
        recv_event(&mut rx).await,
        Event::Error(403, "Failed to update location".to_string())
    );
    assert_no_more_events(&mut rx).await;
}

#[tokio::test]
async fn retry_response_is_returned_even_when_it_also_fails() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    // Both attempts rejected; the refresh succeeds in between. The second
    // response is final: no further refresh, no retry loop.
    Mock::given(method("POST"))
        .and(path("/location"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-2",
            "expiresAt": "2024-05-01T01:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/location"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 1.0,
            longitude: 2.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    assert_eq!(
        recv_event(&mut rx).await,
        Event::Error(403, "Failed to update location".to_string())
    );
}

// ============================================================================
// Continuous Pipeline Tests
// ============================================================================

#[tokio::test]
async fn continuous_updates_report_every_sample_until_destroy() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok"
        })))
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 48.85,
            longitude: 2.35,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.enable_continuous(Duration::from_millis(25), on_update, on_error);

    for _ in 0..3 {
        assert_eq!(recv_event(&mut rx).await, Event::Update(48.85, 2.35));
    }

    session.destroy();

    // Drain whatever was already in flight when destroy landed, then the
    // stream of callbacks must go quiet.
    while let Ok(Some(_)) = timeout(Duration::from_millis(200), rx.recv()).await {}
    assert_no_more_events(&mut rx).await;
}

#[tokio::test]
async fn continuous_updates_survive_per_sample_failures() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    // Every update fails; the subscription must keep reporting failures
    // rather than terminate on the first.
    Mock::given(method("POST"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 1.0,
            longitude: 2.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.enable_continuous(Duration::from_millis(25), on_update, on_error);

    for _ in 0..3 {
        assert_eq!(
            recv_event(&mut rx).await,
            Event::Error(500, "Failed to update location".to_string())
        );
    }

    session.destroy();
}

#[tokio::test]
async fn continuous_reports_unavailable_source_once() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    let session = Session::initialize(
        config_for(&server),
        UnavailableSource("Missing location permission"),
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.enable_continuous(Duration::from_millis(25), on_update, on_error);

    assert_eq!(
        recv_event(&mut rx).await,
        Event::Error(-1, "Missing location permission".to_string())
    );
    assert_no_more_events(&mut rx).await;
}

// ============================================================================
// Session Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn operations_after_destroy_are_no_ops() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let session = Session::initialize(
        config_for(&server),
        FixedSource {
            latitude: 1.0,
            longitude: 2.0,
        },
        MemoryTokenStore::new(),
    )
    .await
    .unwrap();

    session.destroy();
    session.destroy(); // must stay safe to repeat

    let (on_update, on_error, mut rx) = channel_callbacks();
    session.request_once(on_update, on_error);

    let (on_update, on_error, mut continuous_rx) = channel_callbacks();
    session.enable_continuous(Duration::from_millis(25), on_update, on_error);

    assert_no_more_events(&mut rx).await;
    assert_no_more_events(&mut continuous_rx).await;
}
