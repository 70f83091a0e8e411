//! Fake Fast-DB query server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `POST /query`: records the request body and replies with whatever
//!   status and body the test configured (default: `success: true`,
//!   `data: null`).
//!
//! # Example
//!
//! ```rust,no_run
//! # tokio_test::block_on(async {
//! use common::fake_fastdb_api::FakeFastDb;
//!
//! let api = FakeFastDb::start().await.unwrap();
//! api.respond_json(serde_json::json!({"success": false, "error": "table not found"})).await;
//!
//! let client = api.client();
//! # });
//! ```

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use fastdb::{BatchSearchClient, ClientConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// State shared between the router and test code.
struct ApiState {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    /// Every request body received, parsed as JSON.
    requests: Vec<serde_json::Value>,
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: serde_json::json!({
                "success": true,
                "data": null,
                "error": null,
                "elapsed_ms": 0
            })
            .to_string(),
            delay: None,
            requests: Vec::new(),
        }
    }
}

/// Handle to the running fake query server.
pub struct FakeFastDb {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeFastDb {
    /// Start the fake server on a random port. Returns once the listener is
    /// bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route("/query", post(query))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client config pointing at this server.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::with_base_url(self.base_url())
    }

    /// HTTP client pointing at this server.
    pub fn client(&self) -> BatchSearchClient {
        BatchSearchClient::new(self.config())
    }

    /// Reply `200 OK` with this JSON body.
    pub async fn respond_json(&self, body: serde_json::Value) {
        self.respond_raw(StatusCode::OK, body.to_string()).await;
    }

    /// Reply with an arbitrary status and body.
    pub async fn respond_raw(&self, status: StatusCode, body: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.status = status;
        state.body = body.into();
    }

    /// Hold every reply for `delay` before sending it.
    pub async fn delay(&self, delay: Duration) {
        self.state.lock().await.delay = Some(delay);
    }

    /// Request bodies received so far.
    pub async fn requests(&self) -> Vec<serde_json::Value> {
        self.state.lock().await.requests.clone()
    }
}

/// Base URL of a port nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn query(State(state): State<Arc<Mutex<ApiState>>>, body: Bytes) -> impl IntoResponse {
    let (status, reply, delay) = {
        let mut state = state.lock().await;
        let parsed = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        state.requests.push(parsed);
        (state.status, state.body.clone(), state.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    (status, [(header::CONTENT_TYPE, "application/json")], reply)
}
