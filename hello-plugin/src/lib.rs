//! Reference plugin: `/plugin/hello` answers JSON, `/plugin/echo` returns
//! the request body, anything else is a 404.
//!
//! Built as a `cdylib`, it exports the direct-call ABI by default and the
//! pull/push ABI with `--features pull`.

use std::time::{SystemTime, UNIX_EPOCH};

use plugin_abi_ffi::{AbiError, HttpRequest, HttpResponse};
use serde_json::json;

pub fn handle(request: HttpRequest) -> Result<HttpResponse, AbiError> {
    match request.url.as_str() {
        "/plugin/hello" => hello(&request),
        "/plugin/echo" => Ok(HttpResponse::bytes(request.body.as_bytes(), "text/plain")),
        _ => Ok(HttpResponse {
            status_code: 404,
            ..HttpResponse::bytes(b"Unknown endpoint", "text/plain")
        }),
    }
}

fn hello(request: &HttpRequest) -> Result<HttpResponse, AbiError> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let query = request.query_pairs();
    let body = json!({
        "message": "Hello from Rust plugin!",
        "timestamp": timestamp,
        "request_id": query.get("request_id"),
        "method": request.method.as_str(),
    });
    let encoded = serde_json::to_vec(&body).map_err(|e| AbiError::Encode(e.to_string()))?;
    Ok(HttpResponse::bytes(&encoded, "application/json"))
}

#[cfg(not(feature = "pull"))]
plugin_abi_ffi::export_direct_handler!(handle);

#[cfg(feature = "pull")]
plugin_abi_ffi::export_pull_handler!(handle);
