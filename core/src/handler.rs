//! The seam where plugin business logic plugs in.

use crate::error::AbiError;
use crate::types::{HttpRequest, HttpResponse};

/// Business logic behind the plugin boundary.
///
/// An `Err` means the plugin could not do its job; both entry points turn
/// it into `HttpResponse::from_error`. Ordinary HTTP failures such as 404
/// should be returned as `Ok` with the matching `status_code`.
pub trait RequestHandler {
    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, AbiError>;
}

impl<F> RequestHandler for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, AbiError>,
{
    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, AbiError> {
        self(request)
    }
}

/// Run `handler`, folding a handler error into an error response.
pub fn respond(handler: &impl RequestHandler, request: HttpRequest) -> HttpResponse {
    handler
        .handle(request)
        .unwrap_or_else(|err| HttpResponse::from_error(&err))
}
