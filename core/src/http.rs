//! Plain-data descriptions of the plugin's own outbound calls to the host.
//!
//! # Design
//! `HostClient` builds `OutboundRequest` values and parses
//! `OutboundResponse` values without touching the network; the ffi crate
//! executes them. These are distinct from `types::HttpRequest`, which is the
//! request the host forwards *to* the plugin.

use crate::types::HttpMethod;

/// A callback into the host, described as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// What the host answered to an `OutboundRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub status: u16,
    pub body: String,
}
