//! Request/response data model exchanged between host and plugin.
//!
//! # Design
//! Every field of `HttpRequest` and `HostContext` is `#[serde(default)]`, so
//! a payload with missing keys decodes into the documented defaults instead
//! of failing. An explicit `null` is treated the same as a missing key.
//! `headers` is a plain map and is therefore never absent.
//!
//! `HttpResponse::body` is a `Vec<u8>`, which serde_json renders as an array
//! of integers 0-255. The host reads exactly that shape; do not switch it to
//! a string or base64.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AbiError;

/// Read `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// HTTP verb of an inbound request.
///
/// Unknown verbs are kept verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Other(verb) => verb,
        }
    }
}

impl From<String> for HttpMethod {
    fn from(verb: String) -> Self {
        match verb.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Other(verb),
        }
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Other(verb) => verb,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment the host describes to the plugin on every request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostContext {
    /// Base URL for callbacks into the host, e.g. `http://127.0.0.1:3000`.
    #[serde(deserialize_with = "null_as_default")]
    pub host_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub plugin_prefix_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_text: Option<String>,
}

impl HostContext {
    /// Parse `config_text` as TOML.
    pub fn parse_config<T: DeserializeOwned>(&self) -> Result<T, AbiError> {
        let text = self
            .config_text
            .as_deref()
            .ok_or_else(|| AbiError::Config("config_text is required".to_string()))?;
        toml::from_str(text).map_err(|e| AbiError::Decode(e.to_string()))
    }
}

/// The inbound unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub method: HttpMethod,
    #[serde(deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    /// Raw query string. See `query_pairs` and `parse_query`.
    #[serde(deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub context: HostContext,
}

impl HttpRequest {
    /// `url` with the plugin mount prefix removed. Falls back to the full
    /// url when it is not under the prefix.
    pub fn suffix_url(&self) -> &str {
        self.url
            .strip_prefix(self.context.plugin_prefix_url.as_str())
            .unwrap_or(&self.url)
    }

    pub fn match_suffix(&self, suffix: &str) -> bool {
        self.suffix_url() == suffix
    }

    /// True when the request targets the plugin mount point itself.
    pub fn match_suffix_default(&self) -> bool {
        self.match_suffix("")
    }

    /// Decode `query` as `application/x-www-form-urlencoded`. Repeated keys
    /// keep the last value.
    pub fn query_pairs(&self) -> HashMap<String, String> {
        let raw = self.query.strip_prefix('?').unwrap_or(&self.query);
        url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect()
    }

    /// Decode `query` into `T`, e.g. a struct of optional filters.
    pub fn parse_query<T: DeserializeOwned>(&self) -> Result<T, AbiError> {
        let raw = self.query.strip_prefix('?').unwrap_or(&self.query);
        serde_urlencoded::from_str(raw).map_err(|e| AbiError::Decode(format!("query: {e}")))
    }

    /// Decode an `application/x-www-form-urlencoded` body into `T`.
    pub fn parse_body_form<T: DeserializeOwned>(&self) -> Result<T, AbiError> {
        serde_urlencoded::from_str(&self.body)
            .map_err(|e| AbiError::Decode(format!("form body: {e}")))
    }

    pub fn parse_body_json<T: DeserializeOwned>(&self) -> Result<T, AbiError> {
        serde_json::from_str(&self.body).map_err(|e| AbiError::Decode(e.to_string()))
    }
}

fn default_status_code() -> u16 {
    200
}

/// The outbound unit of work.
///
/// `status_code` is the emulated HTTP status of the business logic. `error`
/// is only set when the plugin itself failed to run; a 404 produced by
/// normal routing leaves it `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<u8>,
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            body: Vec::new(),
            status_code: default_status_code(),
            error: None,
        }
    }
}

impl HttpResponse {
    /// 200 response with the given body and `Content-Type`.
    pub fn bytes(body: &[u8], content_type: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), content_type.to_string());
        Self {
            headers,
            body: body.to_vec(),
            ..Self::default()
        }
    }

    pub fn text(body: &str) -> Self {
        Self::bytes(body.as_bytes(), "text/plain;charset=UTF-8")
    }

    pub fn html(body: &str) -> Self {
        Self::bytes(body.as_bytes(), "text/html;charset=UTF-8")
    }

    pub fn json<T: Serialize>(body: &T) -> Result<Self, AbiError> {
        let encoded = serde_json::to_vec(body).map_err(|e| AbiError::Encode(e.to_string()))?;
        Ok(Self::bytes(&encoded, "application/json;charset=UTF-8"))
    }

    pub fn not_found() -> Self {
        Self {
            status_code: 404,
            ..Self::text("page not found")
        }
    }

    /// Response reporting that the plugin failed to execute: status 500,
    /// empty body, `error` set to the rendered cause.
    pub fn from_error(err: &dyn fmt::Display) -> Self {
        Self {
            status_code: 500,
            error: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn is_plugin_failure(&self) -> bool {
        self.error.is_some()
    }
}
