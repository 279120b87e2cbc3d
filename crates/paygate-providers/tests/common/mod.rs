// crates/paygate-providers/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for paygate-providers tests.
// Purpose: Provide a request-counting stub server and gateway builders.
// Dependencies: paygate-core, tiny_http
// ============================================================================

//! ## Overview
//! Provides a local HTTP stub that serves canned JSON replies in sequence
//! while recording every request, so tests can assert both the outcome and
//! the exact number and shape of outbound calls (including zero).

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use paygate_core::GatewayCredentials;
use paygate_core::GatewayMode;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Canned Responses
// ============================================================================

/// One canned reply served by the stub.
pub struct StubResponse {
    /// HTTP status code to reply with.
    pub status: u16,
    /// JSON body to reply with.
    pub body: String,
}

impl StubResponse {
    /// Creates a 200 reply with the given JSON body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Creates a reply with an explicit status code.
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

// ============================================================================
// SECTION: Recorded Requests
// ============================================================================

/// One request observed by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path including query.
    pub path: String,
    /// Request body as UTF-8.
    pub body: String,
    /// All request headers as (name, value) pairs.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Returns the first header with the given name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// ============================================================================
// SECTION: Stub Server
// ============================================================================

/// Request-counting local HTTP server.
pub struct StubServer {
    /// Base URL of the listener.
    base_url: String,
    /// Number of requests observed.
    hits: Arc<AtomicUsize>,
    /// Recorded requests in arrival order.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Shutdown flag for the accept loop.
    stop: Arc<AtomicBool>,
    /// Accept loop handle.
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Spawns a stub that serves `responses` in order; extra requests get a
    /// 500 so over-calling shows up as a test failure, not a hang.
    pub fn spawn(responses: Vec<StubResponse>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let base_url = format!("http://{addr}");
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let loop_hits = Arc::clone(&hits);
        let loop_requests = Arc::clone(&requests);
        let loop_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let mut queue = responses.into_iter();
            while !loop_stop.load(Ordering::Relaxed) {
                let Ok(Some(mut request)) = server.recv_timeout(Duration::from_millis(25)) else {
                    continue;
                };
                loop_hits.fetch_add(1, Ordering::Relaxed);
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let headers = request
                    .headers()
                    .iter()
                    .map(|header| (header.field.to_string(), header.value.to_string()))
                    .collect();
                loop_requests.lock().unwrap().push(RecordedRequest {
                    method: request.method().to_string(),
                    path: request.url().to_string(),
                    body,
                    headers,
                });
                let reply = queue.next().unwrap_or_else(|| StubResponse {
                    status: 500,
                    body: r#"{"error":"unexpected extra request"}"#.to_string(),
                });
                let response = Response::from_string(reply.body)
                    .with_status_code(reply.status)
                    .with_header(
                        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                    );
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            hits,
            requests,
            stop,
            handle: Some(handle),
        }
    }

    /// Returns the stub base URL.
    pub fn url(&self) -> String {
        self.base_url.clone()
    }

    /// Returns the number of requests observed so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the recorded requests in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// SECTION: Gateway Helpers
// ============================================================================

/// Sandbox-mode credentials pointed at the stub.
pub fn sandbox_gateway(endpoint: &str) -> GatewayCredentials {
    GatewayCredentials::new("pk_test_public", "sk_test_secret", GatewayMode::Sandbox)
        .with_endpoint(endpoint)
}

/// Sandbox-mode credentials with no endpoint override.
pub fn plain_gateway() -> GatewayCredentials {
    GatewayCredentials::new("pk_test_public", "sk_test_secret", GatewayMode::Sandbox)
}
