//! Blocking execution of `OutboundRequest`s against the host.
//!
//! # Design
//! `Transport` is the I/O seam: `pull` only ever talks to the host through
//! it, so unit tests substitute a scripted implementation. `UreqTransport`
//! disables ureq's status-as-error behavior so 4xx/5xx answers come back as
//! data and `HostClient` decides what they mean.

use std::time::Duration;

use plugin_abi_core::{AbiError, HttpMethod, OutboundRequest, OutboundResponse};

pub trait Transport {
    fn execute(&self, request: OutboundRequest) -> Result<OutboundResponse, AbiError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Every call, connect to last body byte, is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: OutboundRequest) -> Result<OutboundResponse, AbiError> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&url), &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&url), &headers).send_empty(),
            (HttpMethod::Other(verb), _) => {
                return Err(unreachable_host(format!("unsupported method {verb}")));
            }
        };

        let mut response = result.map_err(|e| unreachable_host(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| unreachable_host(e.to_string()))?;

        Ok(OutboundResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn unreachable_host(reason: String) -> AbiError {
    AbiError::Transport {
        status: None,
        body: reason,
    }
}
