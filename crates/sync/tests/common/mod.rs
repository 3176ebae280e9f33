//! In-process stand-in for the finance backend.
#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Value>>,
    next_id: i64,
    requests: Vec<Recorded>,
    failures: VecDeque<(StatusCode, Value)>,
    held_lists: VecDeque<oneshot::Receiver<Vec<Value>>>,
    canned: HashMap<(Method, String), Value>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().next_id = 1;
        backend
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Serves the backend on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub fn seed(&self, collection: &str, items: Vec<Value>) {
        self.lock()
            .collections
            .insert(collection.trim_start_matches('/').to_string(), items);
    }

    pub fn set_next_id(&self, id: i64) {
        self.lock().next_id = id;
    }

    pub fn items(&self, collection: &str) -> Vec<Value> {
        self.lock()
            .collections
            .get(collection.trim_start_matches('/'))
            .cloned()
            .unwrap_or_default()
    }

    /// Makes the next request fail with `status`.
    pub fn fail_next(&self, status: StatusCode, body: Value) {
        self.lock().failures.push_back((status, body));
    }

    /// Parks the next collection GET until the returned sender supplies its
    /// answer.
    pub fn hold_next_list(&self) -> oneshot::Sender<Vec<Value>> {
        let (tx, rx) = oneshot::channel();
        self.lock().held_lists.push_back(rx);
        tx
    }

    /// Fixed answer for `method path`, checked before collection routing.
    pub fn respond(&self, method: Method, path: &str, value: Value) {
        self.lock().canned.insert((method, path.to_string()), value);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.lock().requests.clone()
    }

    pub fn requests_for(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub async fn wait_for_requests(&self, count: usize) {
        wait_until(|| self.lock().requests.len() >= count).await;
    }
}

pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 5s"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn id_matches(item: &Value, id: &str) -> bool {
    match &item["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    let held = {
        let mut inner = backend.lock();
        inner.requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            content_type: headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: body.clone(),
        });

        if let Some((status, body)) = inner.failures.pop_front() {
            return (status, Json(body)).into_response();
        }
        if let Some(value) = inner.canned.get(&(method.clone(), path.clone())) {
            return Json(value.clone()).into_response();
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        if method == Method::GET && segments.len() == 1 {
            inner.held_lists.pop_front()
        } else {
            None
        }
    };

    if let Some(rx) = held {
        let items = rx.await.unwrap_or_default();
        return Json(Value::Array(items)).into_response();
    }

    let mut inner = backend.lock();
    let segments: Vec<String> = path
        .trim_matches('/')
        .split('/')
        .map(str::to_string)
        .collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", [collection]) => {
            let items = inner.collections.get(collection).cloned().unwrap_or_default();
            Json(Value::Array(items)).into_response()
        }
        ("POST", [collection]) => {
            let id = inner.next_id;
            inner.next_id += 1;
            let mut created = body.unwrap_or_else(|| json!({}));
            created["id"] = json!(id);
            inner
                .collections
                .entry(collection.clone())
                .or_default()
                .push(created.clone());
            (StatusCode::CREATED, Json(created)).into_response()
        }
        ("PUT", [collection, id]) => {
            let items = inner.collections.entry(collection.clone()).or_default();
            match items.iter_mut().find(|item| id_matches(item, id)) {
                Some(slot) => {
                    let mut updated = body.unwrap_or_else(|| json!({}));
                    updated["id"] = slot["id"].clone();
                    *slot = updated.clone();
                    Json(updated).into_response()
                }
                None => not_found(),
            }
        }
        ("DELETE", [collection, id]) => {
            let items = inner.collections.entry(collection.clone()).or_default();
            let before = items.len();
            items.retain(|item| !id_matches(item, id));
            if items.len() == before {
                return not_found();
            }
            Json(json!({ "mensaje": "eliminado correctamente" })).into_response()
        }
        _ => not_found(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "No encontrado" })),
    )
        .into_response()
}
