//! Direct-call variant: the serialized request crosses the boundary as a C
//! string and the serialized response is returned as one.
//!
//! # Design
//! Nothing here aborts the process. A malformed request, a handler error and
//! a handler panic all come back to the host as an encoded `HttpResponse`
//! with status 500 and `error` set. The returned string is owned by the host
//! until it hands it back through `release_string`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use plugin_abi_core::{decode_request, encode_response, AbiError, HttpResponse, RequestHandler};

use crate::guard::{panic_message, respond_catching, run_logging_panic};

/// Returned when even the error response cannot be encoded.
const FALLBACK_RESPONSE: &str =
    r#"{"headers":{},"body":[],"status_code":500,"error":"failed to encode response"}"#;

/// Decode `input`, run `handler`, encode the result.
pub fn handle_serialized(handler: &impl RequestHandler, input: &str) -> String {
    let response = match decode_request(input) {
        Ok(request) => respond_catching(handler, request),
        Err(err) => {
            log::warn!("rejecting malformed request: {err}");
            HttpResponse::from_error(&err)
        }
    };
    encode_or_fallback(&response)
}

fn encode_or_fallback(response: &HttpResponse) -> String {
    encode_response(response).unwrap_or_else(|err| {
        log::error!("{err}");
        encode_response(&HttpResponse::from_error(&err))
            .unwrap_or_else(|_| FALLBACK_RESPONSE.to_string())
    })
}

/// C-string form of `handle_serialized`.
///
/// A null or non-UTF-8 `input` yields an error response rather than a crash.
/// The returned pointer is never null and must be released exactly once with
/// `release_string`.
///
/// # Safety
/// `input` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub unsafe fn handle_raw(handler: &impl RequestHandler, input: *const c_char) -> *mut c_char {
    let encoded = catch_unwind(AssertUnwindSafe(|| {
        if input.is_null() {
            let err = AbiError::Decode("null request pointer".to_string());
            return encode_or_fallback(&HttpResponse::from_error(&err));
        }
        match unsafe { CStr::from_ptr(input) }.to_str() {
            Ok(text) => handle_serialized(handler, text),
            Err(e) => {
                let err = AbiError::Decode(format!("request is not UTF-8: {e}"));
                encode_or_fallback(&HttpResponse::from_error(&err))
            }
        }
    }))
    .unwrap_or_else(|payload| {
        let msg = panic_message(payload.as_ref());
        log::error!("{msg}");
        encode_or_fallback(&HttpResponse::from_error(&msg))
    });

    // serde_json escapes NUL, so this only fails if the fallback path is hit
    // with a corrupted string.
    CString::new(encoded)
        .unwrap_or_else(|_| CString::new(FALLBACK_RESPONSE).unwrap_or_default())
        .into_raw()
}

/// Reclaim a string returned by `handle_raw`. Null is a no-op.
///
/// # Safety
/// `ptr` must be null or a pointer obtained from `handle_raw` that has not
/// been released yet. Releasing the same pointer twice is undefined behavior.
pub unsafe fn release_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// `release_string` for the exported `free_c_string`: a panic while
/// releasing is logged and stopped at the boundary.
///
/// # Safety
/// Same contract as `release_string`.
pub unsafe fn release_raw(ptr: *mut c_char) {
    run_logging_panic("free_c_string", || unsafe { release_string(ptr) });
}
