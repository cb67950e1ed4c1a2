//! Keeps handler panics on this side of the boundary.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use plugin_abi_core::{respond, HttpRequest, HttpResponse, RequestHandler};

/// Run the handler; a handler error or panic becomes a 500 error response.
pub(crate) fn respond_catching(handler: &impl RequestHandler, request: HttpRequest) -> HttpResponse {
    catch_unwind(AssertUnwindSafe(|| respond(handler, request))).unwrap_or_else(|payload| {
        let msg = panic_message(payload.as_ref());
        log::error!("{msg}");
        HttpResponse::from_error(&msg)
    })
}

/// Run `f` with unwinding stopped here. A panic is logged under `context`
/// and reported as `false`.
pub(crate) fn run_logging_panic(context: &str, f: impl FnOnce()) -> bool {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            log::error!("{context}: {}", panic_message(payload.as_ref()));
            false
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("plugin panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("plugin panicked: {s}")
    } else {
        "plugin panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use plugin_abi_core::AbiError;

    use super::*;

    fn panicking(_req: HttpRequest) -> Result<HttpResponse, AbiError> {
        panic!("index out of bounds");
    }

    #[test]
    fn panic_becomes_error_response() {
        let resp = respond_catching(&panicking, HttpRequest::default());
        assert_eq!(resp.status_code, 500);
        assert_eq!(
            resp.error.as_deref(),
            Some("plugin panicked: index out of bounds")
        );
    }

    #[test]
    fn run_logging_panic_contains_panic() {
        assert!(!run_logging_panic("free_c_string", || panic!("double free")));
    }

    #[test]
    fn run_logging_panic_reports_normal_completion() {
        let mut ran = false;
        assert!(run_logging_panic("free_c_string", || ran = true));
        assert!(ran);
    }

    #[test]
    fn formatted_panic_payload_is_reported() {
        let payload: Box<dyn Any + Send> = Box::new(format!("bad id {}", 3));
        assert_eq!(panic_message(payload.as_ref()), "plugin panicked: bad id 3");
    }

    #[test]
    fn opaque_panic_payload_has_generic_message() {
        let payload: Box<dyn Any + Send> = Box::new(17u8);
        assert_eq!(panic_message(payload.as_ref()), "plugin panicked");
    }
}
