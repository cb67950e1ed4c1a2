//! Error type shared by the codec, the host callback client and handlers.
//!
//! # Design
//! `Transport` carries the HTTP status when the host answered at all, so a
//! log line can tell "connection refused" apart from "host said 503". The
//! remaining variants hold a rendered message only; nothing downstream
//! matches on the underlying serde or toml error.

use std::fmt;

/// Errors produced while moving a request or response across the plugin
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Inbound JSON (or TOML config) was malformed or had the wrong shape.
    Decode(String),

    /// A value could not be serialized for the wire.
    Encode(String),

    /// A host callback failed to connect or answered with a non-200 status.
    /// `status` is `None` when no HTTP response was received.
    Transport { status: Option<u16>, body: String },

    /// Required configuration was missing.
    Config(String),

    /// Business logic reported a failure.
    Handler(String),
}

impl AbiError {
    pub fn handler(msg: impl Into<String>) -> Self {
        AbiError::Handler(msg.into())
    }
}

impl fmt::Display for AbiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiError::Decode(msg) => write!(f, "decode failed: {msg}"),
            AbiError::Encode(msg) => write!(f, "encode failed: {msg}"),
            AbiError::Transport {
                status: Some(status),
                body,
            } => write!(f, "host returned HTTP {status}: {body}"),
            AbiError::Transport { status: None, body } => {
                write!(f, "host unreachable: {body}")
            }
            AbiError::Config(msg) => write!(f, "configuration error: {msg}"),
            AbiError::Handler(msg) => write!(f, "handler failed: {msg}"),
        }
    }
}

impl std::error::Error for AbiError {}
