//! C-ABI entry points for plugins built on `plugin-abi-core`.
//!
//! # Overview
//! A plugin crate is built as a `cdylib` and invokes exactly one of the
//! export macros with its handler function:
//!
//! ```ignore
//! use plugin_abi_ffi::{AbiError, HttpRequest, HttpResponse};
//!
//! fn handle(request: HttpRequest) -> Result<HttpResponse, AbiError> {
//!     Ok(HttpResponse::text(&request.body))
//! }
//!
//! plugin_abi_ffi::export_direct_handler!(handle);
//! ```
//!
//! # Design
//! - `export_direct_handler!` exports `handle_request(const char*) -> char*`
//!   and `free_c_string(char*)`.
//! - `export_pull_handler!` exports `handle_request(int64_t)`, which fetches
//!   the request from and pushes the response to the host over HTTP.
//! - Both export `handle_request`, so a plugin picks one variant.
//! - Every exported body runs under `catch_unwind`; panics never cross the
//!   boundary.

pub mod direct;
mod guard;
pub mod pull;
pub mod transport;

pub use plugin_abi_core::{
    AbiError, HostConfig, HostContext, HttpMethod, HttpRequest, HttpResponse, RequestHandler,
};
pub use transport::{Transport, UreqTransport};

/// Export the direct-call ABI for `$handler`.
///
/// `$handler` is any path implementing `RequestHandler`, typically a
/// `fn(HttpRequest) -> Result<HttpResponse, AbiError>`.
#[macro_export]
macro_rules! export_direct_handler {
    ($handler:path) => {
        /// Handle one serialized request. The returned string belongs to the
        /// caller and must be passed to `free_c_string` exactly once.
        #[unsafe(no_mangle)]
        pub extern "C" fn handle_request(
            input: *const ::std::os::raw::c_char,
        ) -> *mut ::std::os::raw::c_char {
            unsafe { $crate::direct::handle_raw(&$handler, input) }
        }

        /// Release a string returned by `handle_request`. Null is ignored.
        #[unsafe(no_mangle)]
        pub extern "C" fn free_c_string(ptr: *mut ::std::os::raw::c_char) {
            unsafe { $crate::direct::release_raw(ptr) }
        }
    };
}

/// Export the pull/push ABI for `$handler`.
///
/// The host base URL comes from `HOST` (default `http://127.0.0.1:3000`).
#[macro_export]
macro_rules! export_pull_handler {
    ($handler:path) => {
        /// Fetch request `request_id` from the host, handle it, push the
        /// response back. Failures are logged; nothing is returned.
        #[unsafe(no_mangle)]
        pub extern "C" fn handle_request(request_id: i64) {
            $crate::pull::run(&$handler, request_id)
        }
    };
}
