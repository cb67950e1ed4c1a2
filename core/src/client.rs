//! Stateless request builder and response parser for the host's admin
//! callbacks.
//!
//! # Design
//! `HostClient` holds only a `base_url`. Each callback is split into a
//! `build_*` method that produces an `OutboundRequest` and a `parse_*` method
//! that consumes an `OutboundResponse`. The ffi crate performs the actual
//! round-trip, which keeps this side deterministic and testable without a
//! socket.

use crate::codec::{decode_request, encode_response};
use crate::error::AbiError;
use crate::http::{OutboundRequest, OutboundResponse};
use crate::types::{HttpMethod, HttpRequest, HttpResponse};

pub const GET_REQUEST_INFO_PATH: &str = "/admin/get-request-info";
pub const PUSH_RESPONSE_INFO_PATH: &str = "/admin/push-response-info";

#[derive(Debug, Clone)]
pub struct HostClient {
    base_url: String,
}

impl HostClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_fetch_request(&self, request_id: i64) -> OutboundRequest {
        OutboundRequest {
            method: HttpMethod::Get,
            url: format!("{}{GET_REQUEST_INFO_PATH}?request_id={request_id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_push_request(
        &self,
        request_id: i64,
        response: &HttpResponse,
    ) -> Result<OutboundRequest, AbiError> {
        let body = encode_response(response)?;
        Ok(OutboundRequest {
            method: HttpMethod::Post,
            url: format!("{}{PUSH_RESPONSE_INFO_PATH}?request_id={request_id}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_fetch_response(&self, response: OutboundResponse) -> Result<HttpRequest, AbiError> {
        check_status(&response)?;
        decode_request(&response.body)
    }

    pub fn parse_push_response(&self, response: OutboundResponse) -> Result<(), AbiError> {
        check_status(&response)
    }
}

/// Both admin endpoints answer exactly 200 on success; anything else,
/// including other 2xx codes, is a transport failure.
fn check_status(response: &OutboundResponse) -> Result<(), AbiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(AbiError::Transport {
        status: Some(response.status),
        body: response.body.clone(),
    })
}
