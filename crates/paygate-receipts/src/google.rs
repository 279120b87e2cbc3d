// crates/paygate-receipts/src/google.rs
// ============================================================================
// Module: Google Play Receipt Service
// Description: Android Publisher purchase-state check.
// Purpose: Verify Play purchases and record the resulting purchase row.
// Dependencies: paygate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! Google Play verification delegates to the Android Publisher products
//! endpoint, keyed by package name, product id, and purchase token. Only
//! `purchaseState == 0` (purchased) passes; anything else is a terminal
//! failure with no retry. The bearer token for the publisher API is
//! configuration input; the service-account OAuth exchange that produces it
//! is a collaborator outside this core.
//! Invariants:
//! - Missing or unsafe path parameters reject before any network call.
//! - Exactly one outbound call per verification; no retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use paygate_core::ProductCatalog;
use paygate_core::PurchaseRecord;
use paygate_core::PurchaseStore;
use paygate_core::StoreKind;
use paygate_core::StoreProductId;
use paygate_core::Timestamp;
use paygate_core::UserId;
use serde::Deserialize;
use serde_json::Value;

use crate::client;
use crate::error::ReceiptError;
use crate::recorder::PurchaseRecorder;
use crate::recorder::VerifiedPurchase;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the Google Play receipt service.
///
/// # Invariants
/// - `access_token` must carry the `androidpublisher` scope; producing it is
///   the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleReceiptConfig {
    /// Android Publisher API base URL.
    pub api_base: String,
    /// Bearer token for the publisher API.
    pub access_token: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for GoogleReceiptConfig {
    fn default() -> Self {
        Self {
            api_base: "https://androidpublisher.googleapis.com".to_string(),
            access_token: String::new(),
            timeout_ms: client::DEFAULT_TIMEOUT_MS,
            user_agent: client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Minimal product purchase resource; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct GoogleProductPurchase {
    /// 0 = purchased, 1 = canceled, 2 = pending.
    #[serde(default, rename = "purchaseState")]
    purchase_state: Option<i64>,
    /// Play order identifier.
    #[serde(default, rename = "orderId")]
    order_id: Option<String>,
    /// Purchase time in epoch milliseconds, as a decimal string.
    #[serde(default, rename = "purchaseTimeMillis")]
    purchase_time_millis: Option<String>,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Google Play purchase verification service.
///
/// # Invariants
/// - Exactly one outbound call per verification, none on invalid input.
pub struct GoogleReceiptService {
    /// Service configuration.
    config: GoogleReceiptConfig,
    /// Shared recording step.
    recorder: PurchaseRecorder,
}

impl GoogleReceiptService {
    /// Creates a service over the given catalog and store.
    #[must_use]
    pub fn new(
        config: GoogleReceiptConfig,
        catalog: Arc<dyn ProductCatalog>,
        store: Arc<dyn PurchaseStore>,
    ) -> Self {
        Self {
            config,
            recorder: PurchaseRecorder::new(catalog, store),
        }
    }

    /// Verifies one Play purchase and records it.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Rejected`] when parameters are missing, the
    /// purchase state is not `0`, or the product is unknown; transport and
    /// store faults propagate.
    pub async fn verify_and_record(
        &self,
        user_id: UserId,
        package_name: &str,
        product_id: &StoreProductId,
        purchase_token: &str,
    ) -> Result<PurchaseRecord, ReceiptError> {
        if package_name.trim().is_empty()
            || product_id.as_str().trim().is_empty()
            || purchase_token.trim().is_empty()
        {
            return Err(ReceiptError::Rejected(
                "Missing Google Play purchase parameters".to_string(),
            ));
        }
        if !client::is_safe_path_segment(package_name)
            || !client::is_safe_path_segment(product_id.as_str())
            || !client::is_safe_path_segment(purchase_token)
        {
            return Err(ReceiptError::Rejected(
                "Invalid Google Play purchase parameters".to_string(),
            ));
        }

        let base = self.config.api_base.trim_end_matches('/');
        let url = format!(
            "{base}/androidpublisher/v3/applications/{package_name}/purchases/products/{}/tokens/{purchase_token}",
            product_id.as_str(),
        );
        let http = client::build_client(self.config.timeout_ms, &self.config.user_agent)?;
        let response = http
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|err| {
                ReceiptError::Transport(format!("google publisher request failed: {err}"))
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReceiptError::Transport(format!(
                "google publisher returned status {status}"
            )));
        }
        let raw: Value = response.json().await.map_err(|err| {
            ReceiptError::MalformedResponse(format!("google purchase undecodable: {err}"))
        })?;
        let purchase: GoogleProductPurchase = serde_json::from_value(raw.clone()).map_err(|err| {
            ReceiptError::MalformedResponse(format!("google purchase undecodable: {err}"))
        })?;

        if purchase.purchase_state != Some(0) {
            return Err(ReceiptError::Rejected("Payment not completed".to_string()));
        }

        let purchase_time = purchase
            .purchase_time_millis
            .as_deref()
            .and_then(|millis| millis.parse::<i64>().ok())
            .map(Timestamp::UnixMillis)
            .ok_or_else(|| {
                ReceiptError::MalformedResponse("google purchase time undecodable".to_string())
            })?;
        // Older purchases may omit orderId; the token still identifies them.
        let transaction_id = purchase
            .order_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| purchase_token.to_string());

        self.recorder.record(VerifiedPurchase {
            user_id,
            store: StoreKind::GooglePlay,
            product_id: product_id.clone(),
            transaction_id,
            purchase_token: Some(purchase_token.to_string()),
            purchase_time,
            raw_receipt: raw,
        })
    }
}
