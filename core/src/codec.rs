//! JSON wire codec for `HttpRequest` and `HttpResponse`.
//!
//! The wire shape is fixed by the host: requests are objects keyed
//! `method`, `headers`, `query`, `url`, `body`, `context`; responses are
//! `headers`, `body` (integer array), `status_code` and an `error` key that
//! is omitted, never `null`, when unset.
//!
//! serde's derived visitors also accept a struct written as a JSON array of
//! its fields in declaration order. The host never sends that form, so the
//! decoders require objects at the top level and for `context`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AbiError;
use crate::types::{HttpRequest, HttpResponse};

fn parse_object(input: &str, what: &str) -> Result<Value, AbiError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| AbiError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(AbiError::Decode(format!("{what} must be a JSON object")));
    }
    Ok(value)
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, AbiError> {
    serde_json::from_value(value).map_err(|e| AbiError::Decode(e.to_string()))
}

pub fn decode_request(input: &str) -> Result<HttpRequest, AbiError> {
    let value = parse_object(input, "request")?;
    match value.get("context") {
        None | Some(Value::Null) | Some(Value::Object(_)) => {}
        Some(_) => return Err(AbiError::Decode("context must be a JSON object".to_string())),
    }
    from_value(value)
}

pub fn encode_request(request: &HttpRequest) -> Result<String, AbiError> {
    serde_json::to_string(request).map_err(|e| AbiError::Encode(e.to_string()))
}

pub fn decode_response(input: &str) -> Result<HttpResponse, AbiError> {
    from_value(parse_object(input, "response")?)
}

pub fn encode_response(response: &HttpResponse) -> Result<String, AbiError> {
    serde_json::to_string(response).map_err(|e| AbiError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::{HostContext, HttpMethod};

    #[test]
    fn decode_fills_missing_fields_with_defaults() {
        let req = decode_request(r#"{"url":"/plugin/x"}"#).unwrap();
        assert_eq!(req.url, "/plugin/x");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.headers.is_empty());
        assert_eq!(req.context, HostContext::default());
    }

    #[test]
    fn decode_empty_object_equals_default() {
        assert_eq!(decode_request("{}").unwrap(), HttpRequest::default());
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let err = decode_request("{not json").unwrap_err();
        assert!(matches!(err, AbiError::Decode(_)));
    }

    #[test]
    fn decode_rejects_non_string_method() {
        let err = decode_request(r#"{"method":42}"#).unwrap_err();
        assert!(matches!(err, AbiError::Decode(_)));
    }

    #[test]
    fn decode_rejects_non_object_payload() {
        assert!(decode_request("[]").is_err());
        assert!(decode_request(r#""GET""#).is_err());
        assert!(decode_request("null").is_err());
    }

    #[test]
    fn decode_rejects_positional_array_request() {
        let err = decode_request(r#"["DELETE",{},"q","/plugin/x"]"#).unwrap_err();
        assert!(matches!(err, AbiError::Decode(ref msg) if msg == "request must be a JSON object"));
    }

    #[test]
    fn decode_rejects_array_context() {
        let err = decode_request(r#"{"url":"/plugin/x","context":["http://h"]}"#).unwrap_err();
        assert!(matches!(err, AbiError::Decode(ref msg) if msg == "context must be a JSON object"));
    }

    #[test]
    fn decode_accepts_null_context() {
        let req = decode_request(r#"{"url":"/plugin/x","context":null}"#).unwrap();
        assert_eq!(req.context, HostContext::default());
    }

    #[test]
    fn request_round_trip_keeps_absent_config_absent() {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "*/*".to_string());
        let req = HttpRequest {
            method: HttpMethod::Post,
            headers,
            query: "a=1".to_string(),
            url: "/plugin/echo".to_string(),
            body: "payload".to_string(),
            context: HostContext {
                host_url: "http://127.0.0.1:3000".to_string(),
                plugin_prefix_url: "/plugin".to_string(),
                data_dir: "/tmp/p".to_string(),
                config_text: None,
            },
        };
        let encoded = encode_request(&req).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert!(value["context"].get("config_text").is_none());
        assert_eq!(decode_request(&encoded).unwrap(), req);
    }

    #[test]
    fn response_body_encodes_as_integer_array() {
        let resp = HttpResponse {
            body: vec![72, 105],
            ..Default::default()
        };
        let encoded = encode_response(&resp).unwrap();
        assert!(encoded.contains(r#""body":[72,105]"#), "{encoded}");
        assert_eq!(decode_response(&encoded).unwrap().body, vec![72, 105]);
    }

    #[test]
    fn response_body_covers_full_byte_range() {
        let resp = HttpResponse {
            body: vec![0, 127, 128, 255],
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&encode_response(&resp).unwrap()).unwrap();
        assert_eq!(value["body"], serde_json::json!([0, 127, 128, 255]));
    }

    #[test]
    fn unset_error_key_is_omitted() {
        let encoded = encode_response(&HttpResponse::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert!(value.get("error").is_none());
        assert!(!encoded.contains("null"));
    }

    #[test]
    fn set_error_key_is_present() {
        let resp = HttpResponse::from_error(&"boom");
        let value: serde_json::Value =
            serde_json::from_str(&encode_response(&resp).unwrap()).unwrap();
        assert_eq!(value["error"], "boom");
        assert_eq!(value["status_code"], 500);
    }

    #[test]
    fn decode_response_defaults_status_to_200() {
        let resp = decode_response(r#"{"headers":{},"body":[]}"#).unwrap();
        assert_eq!(resp.status_code, 200);
        assert!(resp.error.is_none());
    }

    #[test]
    fn decode_response_rejects_positional_array() {
        let err = decode_response(r#"[{},[104,105],201]"#).unwrap_err();
        assert!(matches!(err, AbiError::Decode(_)));
    }

    #[test]
    fn decode_response_rejects_out_of_range_byte() {
        assert!(decode_response(r#"{"body":[256]}"#).is_err());
    }
}
