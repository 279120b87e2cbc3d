// crates/paygate-receipts/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for paygate-receipts tests.
// Purpose: Provide a counting stub server, memory store, and catalog builder.
// Dependencies: paygate-core, tiny_http
// ============================================================================

//! ## Overview
//! Provides a request-counting HTTP stub (receipt endpoints are plain JSON
//! POST/GET), an in-memory append-only purchase store, and a catalog
//! pre-seeded with one known product per store.

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

use paygate_core::PurchaseRecord;
use paygate_core::PurchaseStore;
use paygate_core::StaticCatalog;
use paygate_core::StoreError;
use paygate_core::StoreKind;
use paygate_core::StoreProductId;
use paygate_core::UnifiedPackageId;
use paygate_core::UserId;
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
                loop_requests.lock().unwrap().push(RecordedRequest {
                    method: request.method().to_string(),
                    path: request.url().to_string(),
                    body,
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
// SECTION: Memory Store
// ============================================================================

/// In-memory append-only purchase store.
#[derive(Debug, Default)]
pub struct MemoryPurchaseStore {
    /// Inserted records in insertion order.
    records: Mutex<Vec<PurchaseRecord>>,
}

impl MemoryPurchaseStore {
    /// Returns all inserted records.
    pub fn records(&self) -> Vec<PurchaseRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl PurchaseStore for MemoryPurchaseStore {
    fn insert(&self, record: &PurchaseRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|row| row.store == record.store && row.transaction_id == record.transaction_id)
        {
            return Err(StoreError::Duplicate(record.transaction_id.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    fn find_by_transaction(
        &self,
        store: StoreKind,
        transaction_id: &str,
    ) -> Result<Option<PurchaseRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.store == store && row.transaction_id == transaction_id)
            .cloned())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<PurchaseRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// SECTION: Catalog Helpers
// ============================================================================

/// Catalog with one known product per store.
pub fn seeded_catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    catalog.insert(
        StoreKind::AppleAppStore,
        StoreProductId::new("com.esim.global10"),
        UnifiedPackageId::new("pkg_global_10gb"),
    );
    catalog.insert(
        StoreKind::GooglePlay,
        StoreProductId::new("com.esim.global10"),
        UnifiedPackageId::new("pkg_global_10gb"),
    );
    catalog
}

/// A valid non-zero user id for tests.
pub fn test_user() -> UserId {
    UserId::from_raw(42).unwrap()
}
