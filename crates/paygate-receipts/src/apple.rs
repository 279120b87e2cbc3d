// crates/paygate-receipts/src/apple.rs
// ============================================================================
// Module: Apple Receipt Service
// Description: verifyReceipt submission with bounded sandbox fallback.
// Purpose: Verify App Store receipts and record the resulting purchase.
// Dependencies: paygate-core, reqwest, serde, base64
// ============================================================================

//! ## Overview
//! Apple receipts are posted to the production `verifyReceipt` endpoint
//! first. Status `21007` means a sandbox receipt was sent to production;
//! that triggers exactly one fallback call against the sandbox endpoint
//! (the only automatic retry in all of PayGate), and the second response
//! alone decides the outcome. Any other non-zero status is terminal.
//! Invariants:
//! - An empty or non-base64 receipt is rejected before any network call.
//! - The first `in_app` transaction identifies the purchase; a receipt
//!   without transactions is rejected.
//! - The raw verifyReceipt response is retained as the audit blob.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use paygate_core::ProductCatalog;
use paygate_core::PurchaseRecord;
use paygate_core::PurchaseStore;
use paygate_core::StoreKind;
use paygate_core::StoreProductId;
use paygate_core::Timestamp;
use paygate_core::UserId;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

use crate::client;
use crate::error::ReceiptError;
use crate::recorder::PurchaseRecorder;
use crate::recorder::VerifiedPurchase;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the Apple receipt service.
///
/// # Invariants
/// - URLs are full endpoint URLs, not bases; tests point them at stubs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppleReceiptConfig {
    /// Production verifyReceipt endpoint.
    pub production_url: String,
    /// Sandbox verifyReceipt endpoint, used only on status 21007.
    pub sandbox_url: String,
    /// App-specific shared secret sent as `password`.
    pub shared_secret: String,
    /// Request timeout in milliseconds (applies per call).
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for AppleReceiptConfig {
    fn default() -> Self {
        Self {
            production_url: "https://buy.itunes.apple.com/verifyReceipt".to_string(),
            sandbox_url: "https://sandbox.itunes.apple.com/verifyReceipt".to_string(),
            shared_secret: String::new(),
            timeout_ms: client::DEFAULT_TIMEOUT_MS,
            user_agent: client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Minimal verifyReceipt response; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct AppleVerifyResponse {
    /// Apple status code; `0` is valid, `21007` is a sandbox receipt.
    status: i64,
    /// Decoded receipt, present when the status is `0`.
    #[serde(default)]
    receipt: Option<AppleDecodedReceipt>,
}

/// Decoded receipt body.
#[derive(Debug, Deserialize)]
struct AppleDecodedReceipt {
    /// In-app transactions; the first identifies the purchase.
    #[serde(default)]
    in_app: Vec<AppleInAppTransaction>,
}

/// One in-app transaction of a decoded receipt.
#[derive(Debug, Deserialize)]
struct AppleInAppTransaction {
    /// Store product identifier.
    #[serde(default)]
    product_id: Option<String>,
    /// Apple transaction identifier.
    #[serde(default)]
    transaction_id: Option<String>,
    /// Purchase time in epoch milliseconds, as a decimal string.
    #[serde(default)]
    purchase_date_ms: Option<String>,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Apple App Store receipt verification service.
///
/// # Invariants
/// - At most two outbound calls per receipt (production, then the bounded
///   sandbox fallback), none on invalid input.
pub struct AppleReceiptService {
    /// Service configuration.
    config: AppleReceiptConfig,
    /// Shared recording step.
    recorder: PurchaseRecorder,
}

impl AppleReceiptService {
    /// Creates a service over the given catalog and store.
    #[must_use]
    pub fn new(
        config: AppleReceiptConfig,
        catalog: Arc<dyn ProductCatalog>,
        store: Arc<dyn PurchaseStore>,
    ) -> Self {
        Self {
            config,
            recorder: PurchaseRecorder::new(catalog, store),
        }
    }

    /// Verifies one base64 receipt and records the purchase.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Rejected`] for invalid receipts, unknown
    /// products, and receipts without transactions; transport and store
    /// faults propagate.
    pub async fn verify_and_record(
        &self,
        user_id: UserId,
        receipt_base64: &str,
    ) -> Result<PurchaseRecord, ReceiptError> {
        if receipt_base64.trim().is_empty() {
            return Err(ReceiptError::Rejected("Missing Apple receipt".to_string()));
        }
        if BASE64.decode(receipt_base64.trim()).is_err() {
            return Err(ReceiptError::Rejected("Malformed Apple receipt".to_string()));
        }

        let http = client::build_client(self.config.timeout_ms, &self.config.user_agent)?;
        let body = json!({
            "receipt-data": receipt_base64.trim(),
            "password": self.config.shared_secret,
        });

        let mut raw = self.post_receipt(&http, &self.config.production_url, &body).await?;
        let mut parsed = decode_response(&raw)?;
        if parsed.status == 21007 {
            // Sandbox receipt sent to production: one bounded fallback, and
            // the second response alone decides the outcome.
            raw = self.post_receipt(&http, &self.config.sandbox_url, &body).await?;
            parsed = decode_response(&raw)?;
        }
        if parsed.status != 0 {
            return Err(ReceiptError::Rejected(format!(
                "Invalid Apple receipt (status {})",
                parsed.status
            )));
        }

        let Some(transaction) =
            parsed.receipt.and_then(|receipt| receipt.in_app.into_iter().next())
        else {
            return Err(ReceiptError::Rejected(
                "Apple receipt contains no transactions".to_string(),
            ));
        };
        let Some(product_id) = transaction.product_id.filter(|id| !id.is_empty()) else {
            return Err(ReceiptError::MalformedResponse(
                "apple transaction missing product id".to_string(),
            ));
        };
        let Some(transaction_id) = transaction.transaction_id.filter(|id| !id.is_empty()) else {
            return Err(ReceiptError::MalformedResponse(
                "apple transaction missing transaction id".to_string(),
            ));
        };
        let purchase_time = transaction
            .purchase_date_ms
            .as_deref()
            .and_then(|millis| millis.parse::<i64>().ok())
            .map(Timestamp::UnixMillis)
            .ok_or_else(|| {
                ReceiptError::MalformedResponse("apple purchase date undecodable".to_string())
            })?;

        self.recorder.record(VerifiedPurchase {
            user_id,
            store: StoreKind::AppleAppStore,
            product_id: StoreProductId::new(product_id),
            transaction_id,
            purchase_token: None,
            purchase_time,
            raw_receipt: raw,
        })
    }

    /// Posts the receipt payload to one verifyReceipt endpoint.
    async fn post_receipt(
        &self,
        http: &reqwest::Client,
        url: &str,
        body: &Value,
    ) -> Result<Value, ReceiptError> {
        let response = http.post(url).json(body).send().await.map_err(|err| {
            ReceiptError::Transport(format!("apple verifyReceipt request failed: {err}"))
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReceiptError::Transport(format!(
                "apple verifyReceipt returned status {status}"
            )));
        }
        response.json().await.map_err(|err| {
            ReceiptError::MalformedResponse(format!("apple verifyReceipt undecodable: {err}"))
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes the typed response out of the retained raw blob.
fn decode_response(raw: &Value) -> Result<AppleVerifyResponse, ReceiptError> {
    serde_json::from_value(raw.clone()).map_err(|err| {
        ReceiptError::MalformedResponse(format!("apple verifyReceipt undecodable: {err}"))
    })
}
