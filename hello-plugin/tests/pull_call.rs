//! Drive the exported pull/push symbol against a live mock host.
//!
//! Run with `--features pull`.
#![cfg(feature = "pull")]

use mock_host::{HostState, StatusCode};
use serde_json::json;

fn start_host(state: mock_host::SharedState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_host::run_with_state(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

// The exported entry point reads HOST from the process environment, so the
// scenarios share one test and run sequentially.
#[test]
fn exported_handle_request_round_trips_and_survives_failures() {
    let state = HostState::new();
    state.store_request(7, json!({"method":"POST","url":"/plugin/echo","body":"hello"}));
    std::env::set_var("HOST", start_host(state.clone()));

    hello_plugin::handle_request(7);

    assert_eq!(
        state.response(7),
        Some(json!({"headers":{"Content-Type":"text/plain"},"body":[104,101,108,108,111],"status_code":200}))
    );

    let failing = HostState::failing_fetch(StatusCode::SERVICE_UNAVAILABLE);
    std::env::set_var("HOST", start_host(failing.clone()));

    hello_plugin::handle_request(42);

    assert_eq!(failing.fetch_calls(), 1);
    assert_eq!(failing.push_calls(), 0);
}
