use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;

pub use axum::http::StatusCode;

/// In-memory stand-in for the host's request/response stores.
///
/// Requests and responses are kept as raw JSON so tests can assert on the
/// exact wire shape a plugin produced. Locks are `std` mutexes: they are never
/// held across an await, and tests read them from plain threads.
#[derive(Default)]
pub struct HostState {
    requests: Mutex<HashMap<i64, Value>>,
    responses: Mutex<HashMap<i64, Value>>,
    fetch_status: Option<StatusCode>,
    fetch_calls: AtomicUsize,
    push_calls: AtomicUsize,
}

pub type SharedState = Arc<HostState>;

impl HostState {
    pub fn new() -> SharedState {
        Arc::new(Self::default())
    }

    /// A host whose get-request-info endpoint always answers `status`.
    pub fn failing_fetch(status: StatusCode) -> SharedState {
        Arc::new(Self {
            fetch_status: Some(status),
            ..Self::default()
        })
    }

    pub fn store_request(&self, request_id: i64, request: Value) {
        self.requests.lock().unwrap().insert(request_id, request);
    }

    pub fn response(&self, request_id: i64) -> Option<Value> {
        self.responses.lock().unwrap().get(&request_id).cloned()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn push_calls(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
pub struct RequestIdQuery {
    pub request_id: i64,
}

pub fn app() -> Router {
    app_with_state(HostState::new())
}

pub fn app_with_state(state: SharedState) -> Router {
    Router::new()
        .route("/admin/get-request-info", get(get_request_info))
        .route("/admin/push-response-info", post(push_response_info))
        .route("/admin/store-request-info", post(store_request_info))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, HostState::new()).await
}

pub async fn run_with_state(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn get_request_info(
    State(state): State<SharedState>,
    Query(RequestIdQuery { request_id }): Query<RequestIdQuery>,
) -> Response {
    state.fetch_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = state.fetch_status {
        log::warn!("forcing {status} for request {request_id}");
        return (status, "forced failure").into_response();
    }
    let stored = state.requests.lock().unwrap().get(&request_id).cloned();
    match stored {
        Some(request) => Json(request).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("Request with id {request_id} not found"),
        )
            .into_response(),
    }
}

async fn push_response_info(
    State(state): State<SharedState>,
    Query(RequestIdQuery { request_id }): Query<RequestIdQuery>,
    Json(response): Json<Value>,
) -> (StatusCode, &'static str) {
    state.push_calls.fetch_add(1, Ordering::SeqCst);
    log::debug!("response stored for request {request_id}");
    state.responses.lock().unwrap().insert(request_id, response);
    (StatusCode::OK, "Response stored successfully")
}

async fn store_request_info(
    State(state): State<SharedState>,
    Query(RequestIdQuery { request_id }): Query<RequestIdQuery>,
    Json(request): Json<Value>,
) -> (StatusCode, &'static str) {
    state.store_request(request_id, request);
    (StatusCode::OK, "Request stored successfully")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_request_is_visible_to_reader() {
        let state = HostState::new();
        state.store_request(1, serde_json::json!({"url": "/x"}));
        assert_eq!(state.requests.lock().unwrap()[&1]["url"], "/x");
    }

    #[test]
    fn response_is_none_until_pushed() {
        let state = HostState::new();
        assert!(state.response(9).is_none());
        assert_eq!(state.push_calls(), 0);
    }

    #[test]
    fn failing_fetch_records_status() {
        let state = HostState::failing_fetch(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(state.fetch_status, Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn request_id_query_parses_negative_ids() {
        let q: RequestIdQuery = serde_json::from_str(r#"{"request_id":-3}"#).unwrap();
        assert_eq!(q.request_id, -3);
    }
}
