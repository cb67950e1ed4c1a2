//! Pull/push variant: only a request id crosses the boundary. The plugin
//! fetches the request from the host, runs the handler and pushes the
//! response back.
//!
//! # Design
//! The exported `handle_request(i64)` has no return channel, so every failure
//! is terminal for the invocation: it is logged and dropped, never retried.
//! `handle_request_id` still returns a `Result` so tests can observe which
//! step failed. A fetch failure means no push is attempted.

use std::panic::{catch_unwind, AssertUnwindSafe};

use plugin_abi_core::{AbiError, HostClient, HostConfig, RequestHandler};

use crate::guard::{panic_message, respond_catching};
use crate::transport::{Transport, UreqTransport};

/// One full fetch, handle, push cycle for `request_id`.
pub fn handle_request_id(
    handler: &impl RequestHandler,
    request_id: i64,
    config: &HostConfig,
    transport: &impl Transport,
) -> Result<(), AbiError> {
    let client = HostClient::new(&config.host_url);

    let request = transport
        .execute(client.build_fetch_request(request_id))
        .and_then(|answer| client.parse_fetch_response(answer))
        .inspect_err(|err| log::error!("failed to fetch request {request_id}: {err}"))?;
    log::debug!(
        "request {request_id}: {} {} query={:?}",
        request.method,
        request.url,
        request.query
    );

    let response = respond_catching(handler, request);

    client
        .build_push_request(request_id, &response)
        .and_then(|push| transport.execute(push))
        .and_then(|answer| client.parse_push_response(answer))
        .inspect_err(|err| log::error!("failed to push response for request {request_id}: {err}"))?;

    log::debug!("request {request_id} answered with {}", response.status_code);
    Ok(())
}

/// Body of the exported entry point: resolve config from the environment,
/// run one cycle over HTTP, swallow the outcome.
pub fn run(handler: &impl RequestHandler, request_id: i64) {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let config = HostConfig::from_env();
        let transport = UreqTransport::new(config.timeout);
        handle_request_id(handler, request_id, &config, &transport)
    }));
    if let Err(payload) = outcome {
        log::error!("request {request_id}: {}", panic_message(payload.as_ref()));
    }
}
