//! Test utilities for extension-it integration tests.
//!
//! `StubHost` is an in-process axum server that answers the administrative
//! registration endpoint and a handful of diagnostic routes, so the harness
//! can be exercised without a real search-engine host.

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderMap, Method as HttpMethod, StatusCode},
    routing::{any, get, post},
};
use extension_it::registration::INITIALIZE_ACKNOWLEDGEMENT;
use extension_it::{HostConfig, RestClient};
use serde_json::{Value, json};
use std::net::TcpListener as StdTcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PROBE_URI: &str = "/probe";
/// Probe route that answers only after [`STALLED_PROBE_DELAY`].
pub const STALLED_PROBE_URI: &str = "/probe/stalled";
pub const STALLED_PROBE_DELAY: Duration = Duration::from_secs(3);
pub const ECHO_URI: &str = "/echo";
pub const FAIL_URI: &str = "/fail";
pub const FAIL_MESSAGE: &str = "Rejected by stub host";

/// How the stub answers registration and readiness probes.
#[derive(Debug, Clone)]
pub struct StubBehaviour {
    pub init_status: StatusCode,
    pub acknowledgement: String,
    /// Number of probe requests answered 503 before the probe turns 200.
    pub ready_after_probes: usize,
}

impl Default for StubBehaviour {
    fn default() -> Self {
        Self {
            init_status: StatusCode::ACCEPTED,
            acknowledgement: INITIALIZE_ACKNOWLEDGEMENT.to_string(),
            ready_after_probes: 0,
        }
    }
}

#[derive(Clone)]
struct StubState {
    behaviour: StubBehaviour,
    init_calls: Arc<AtomicUsize>,
    probe_calls: Arc<AtomicUsize>,
    registrations: Arc<Mutex<Vec<Value>>>,
}

pub struct StubHost {
    port: u16,
    state: StubState,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl StubHost {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_with(StubBehaviour::default()).await
    }

    pub async fn start_with(behaviour: StubBehaviour) -> Result<Self, Box<dyn std::error::Error>> {
        let state = StubState {
            behaviour,
            init_calls: Arc::new(AtomicUsize::new(0)),
            probe_calls: Arc::new(AtomicUsize::new(0)),
            registrations: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/_extensions/initialize/", post(initialize))
            .route(PROBE_URI, get(probe))
            .route(STALLED_PROBE_URI, get(stalled_probe))
            .route(ECHO_URI, any(echo))
            .route(FAIL_URI, any(fail))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            state,
            handle,
        })
    }

    pub fn host_config(&self) -> HostConfig {
        HostConfig::new("127.0.0.1", self.port)
    }

    pub fn client(&self) -> RestClient {
        RestClient::new(&self.host_config()).expect("Failed to build client")
    }

    pub fn init_calls(&self) -> usize {
        self.state.init_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> usize {
        self.state.probe_calls.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> Vec<Value> {
        self.state.registrations.lock().unwrap().clone()
    }
}

impl Drop for StubHost {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Returns a port nothing is listening on.
pub fn unused_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("Failed to bind ephemeral port");
    listener.local_addr().unwrap().port()
}

async fn initialize(State(state): State<StubState>, body: String) -> (StatusCode, Json<Value>) {
    state.init_calls.fetch_add(1, Ordering::SeqCst);
    let registration = serde_json::from_str(&body).unwrap_or(Value::String(body));
    state.registrations.lock().unwrap().push(registration);
    (
        state.behaviour.init_status,
        Json(json!({ "success": state.behaviour.acknowledgement })),
    )
}

async fn probe(State(state): State<StubState>) -> (StatusCode, &'static str) {
    let seen = state.probe_calls.fetch_add(1, Ordering::SeqCst);
    if seen >= state.behaviour.ready_after_probes {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "handlers not registered yet")
    }
}

async fn stalled_probe(State(state): State<StubState>) -> (StatusCode, &'static str) {
    state.probe_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(STALLED_PROBE_DELAY).await;
    (StatusCode::OK, "ready")
}

async fn echo(
    method: HttpMethod,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "contentType": content_type,
        "body": body,
    }))
}

async fn fail() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, FAIL_MESSAGE)
}
