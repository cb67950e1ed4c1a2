//! Guest-side data model and host callback protocol for dynamically loaded
//! HTTP plugins.
//!
//! # Overview
//! A host process forwards an HTTP-like request to a plugin and expects an
//! `HttpResponse` back, either directly as a serialized string or by the
//! plugin pulling the request from, and pushing the response to, the host's
//! admin endpoints. This crate holds everything about that exchange that
//! does not touch the network or raw pointers.
//!
//! # Design
//! - `types` and `codec` define the request/response model and its JSON wire
//!   format once, for both transport variants.
//! - `HostClient` is stateless: `build_*` produces an `OutboundRequest`,
//!   `parse_*` consumes an `OutboundResponse`, and the caller does the I/O.
//! - `HostConfig` resolves the callback base URL and timeout through an
//!   injected lookup.
//! - `RequestHandler` is the only seam plugin authors implement.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod types;

pub use client::HostClient;
pub use codec::{decode_request, decode_response, encode_request, encode_response};
pub use config::HostConfig;
pub use error::AbiError;
pub use handler::{respond, RequestHandler};
pub use http::{OutboundRequest, OutboundResponse};
pub use types::{HostContext, HttpMethod, HttpRequest, HttpResponse};
