//! Local stand-ins for the model endpoint and the catalog store
//!
//! Each server binds an ephemeral port on 127.0.0.1 and records what it received.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use hakim_core::Category;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Scripted model endpoint
#[derive(Clone)]
pub struct ModelScript {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl ModelScript {
    /// 200 response whose first candidate carries `content`
    pub fn content(content: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: completion(content),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the model endpoint saw
#[derive(Default)]
pub struct Recorded {
    pub hits: AtomicU32,
    pub last_body: Mutex<Option<Value>>,
    pub last_headers: Mutex<Option<HeaderMap>>,
}

impl Recorded {
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn body(&self) -> Value {
        self.last_body.lock().unwrap().clone().expect("no request recorded")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.last_headers
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|h| h.get(name))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

#[derive(Clone)]
struct ModelState {
    script: ModelScript,
    recorded: Arc<Recorded>,
}

async fn chat_completions(
    State(state): State<ModelState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.recorded.hits.fetch_add(1, Ordering::SeqCst);
    *state.recorded.last_body.lock().unwrap() = Some(body);
    *state.recorded.last_headers.lock().unwrap() = Some(headers);

    if !state.script.delay.is_zero() {
        tokio::time::sleep(state.script.delay).await;
    }

    (
        state.script.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.script.body.clone(),
    )
}

/// Start a model endpoint; returns its base URL (ending in `/v1`)
pub async fn spawn_model(script: ModelScript) -> (String, Arc<Recorded>) {
    let recorded = Arc::new(Recorded::default());
    let state = ModelState {
        script,
        recorded: recorded.clone(),
    };
    let router = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state);

    (format!("{}/v1", serve(router).await), recorded)
}

#[derive(Clone)]
struct StoreState {
    status: StatusCode,
    rows: Value,
    hits: Arc<AtomicU32>,
}

async fn categories(State(state): State<StoreState>, headers: HeaderMap) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if headers.get("apikey").is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "no apikey"})));
    }

    (state.status, Json(state.rows.clone()))
}

/// Start a catalog store serving `rows`; returns its base URL and a hit counter
pub async fn spawn_store(status: StatusCode, rows: Value) -> (String, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let state = StoreState {
        status,
        rows,
        hits: hits.clone(),
    };
    let router = Router::new()
        .route("/rest/v1/categories", get(categories))
        .with_state(state);

    (serve(router).await, hits)
}

/// An address nothing listens on
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1", addr)
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Chat-completions body with a single candidate
pub fn completion(content: &str) -> String {
    json!({
        "id": "gen-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// A small catalog: Water, Roads, Street Lighting
pub fn catalog() -> Vec<Category> {
    vec![
        Category::new(Uuid::new_v4(), Uuid::new_v4(), "Water", "المياه"),
        Category::new(Uuid::new_v4(), Uuid::new_v4(), "Roads", "الطرق"),
        Category::new(Uuid::new_v4(), Uuid::new_v4(), "Street Lighting", "إنارة الشوارع"),
    ]
}

pub fn rows(categories: &[Category]) -> Value {
    serde_json::to_value(categories).unwrap()
}
