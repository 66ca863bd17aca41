//! Mock image provider backend for integration tests
//!
//! One server answers the `ModelsLab`, `OpenAI` and remove.bg endpoints with
//! canned payloads and records what it was sent.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tokio_util::sync::CancellationToken;

/// URL the mock `ModelsLab` backend reports for every generated image
pub const GENERATED_URL: &str = "https://cdn.example/img1.png";

/// Bytes the mock `OpenAI` and remove.bg backends return
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nmock";

/// Message the mock backends use when told to fail
pub const PROVIDER_FAILURE: &str = "Prompt flagged by safety filter";

/// How the mock answers
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail,
    Slow(Duration),
}

/// Mock provider backend
pub struct MockProvider {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behavior: Behavior,
    request_count: AtomicU32,
    last_json: Mutex<Option<serde_json::Value>>,
    last_form: Mutex<HashMap<String, String>>,
    last_image_len: AtomicU32,
    last_api_key: Mutex<Option<String>>,
}

impl MockProvider {
    /// Start a mock that answers successfully
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Behavior::Succeed).await
    }

    /// Start a mock with the given behavior
    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            request_count: AtomicU32::new(0),
            last_json: Mutex::new(None),
            last_form: Mutex::new(HashMap::new()),
            last_image_len: AtomicU32::new(0),
            last_api_key: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/v6/realtime/text2img", routing::post(handle_modelslab))
            .route("/v1/images/generations", routing::post(handle_openai))
            .route("/v1.0/removebg", routing::post(handle_remove_bg))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for binding the mock as a `ModelsLab` provider
    pub fn modelslab_url(&self) -> String {
        format!("http://{}/api/v6", self.addr)
    }

    /// Base URL for binding the mock as an `OpenAI` provider
    pub fn openai_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Base URL for binding the mock as a remove.bg provider
    pub fn remove_bg_url(&self) -> String {
        format!("http://{}/v1.0", self.addr)
    }

    /// Number of provider requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Last JSON body received
    pub fn last_json(&self) -> Option<serde_json::Value> {
        self.state.last_json.lock().unwrap().clone()
    }

    /// Text field of the last multipart form received
    pub fn form_field(&self, name: &str) -> Option<String> {
        self.state.last_form.lock().unwrap().get(name).cloned()
    }

    /// Size of the last uploaded image file
    pub fn last_image_len(&self) -> u32 {
        self.state.last_image_len.load(Ordering::Relaxed)
    }

    /// API key presented with the last request
    pub fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().unwrap().clone()
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl MockState {
    /// Count the request and apply any configured delay
    async fn begin(&self) -> bool {
        self.request_count.fetch_add(1, Ordering::Relaxed);

        match self.behavior {
            Behavior::Succeed => true,
            Behavior::Fail => false,
            Behavior::Slow(delay) => {
                tokio::time::sleep(delay).await;
                true
            }
        }
    }

    fn record_api_key(&self, key: Option<String>) {
        *self.last_api_key.lock().unwrap() = key;
    }
}

async fn handle_modelslab(State(state): State<Arc<MockState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.record_api_key(body["key"].as_str().map(str::to_owned));
    *state.last_json.lock().unwrap() = Some(body);

    if !state.begin().await {
        // ModelsLab reports failures in a 200 body
        return Json(serde_json::json!({
            "status": "error",
            "message": PROVIDER_FAILURE,
        }))
        .into_response();
    }

    Json(serde_json::json!({
        "status": "success",
        "generationTime": 1.2,
        "id": 42,
        "output": [GENERATED_URL],
    }))
    .into_response()
}

async fn handle_openai(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let key = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);
    state.record_api_key(key);
    *state.last_json.lock().unwrap() = Some(body);

    if !state.begin().await {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": { "message": PROVIDER_FAILURE, "type": "invalid_request_error" }
            })),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "created": 1_700_000_000,
        "data": [{ "b64_json": STANDARD.encode(PNG_BYTES) }],
    }))
    .into_response()
}

async fn handle_remove_bg(State(state): State<Arc<MockState>>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    let key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.record_api_key(key);

    let mut form = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.unwrap_or_default();

        if name == "image_file" {
            state
                .last_image_len
                .store(u32::try_from(bytes.len()).unwrap_or(u32::MAX), Ordering::Relaxed);
        } else {
            form.insert(name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }
    *state.last_form.lock().unwrap() = form;

    if !state.begin().await {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "errors": [{ "title": PROVIDER_FAILURE, "code": "unknown_foreground" }]
            })),
        )
            .into_response();
    }

    ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES).into_response()
}
