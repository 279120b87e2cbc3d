// crates/paygate-receipts/src/recorder.rs
// ============================================================================
// Module: Purchase Recorder
// Description: Catalog resolution plus append-only purchase insertion.
// Purpose: Share the Verified -> Recorded step between both stores.
// Dependencies: paygate-core
// ============================================================================

//! ## Overview
//! The recorder performs the final step of the receipt lifecycle: resolve
//! the store product id through the catalog, build the [`PurchaseRecord`],
//! and insert it. A record is written only after successful delivery of the
//! whole step; failures leave no partial side effects.
//! Invariants:
//! - Unknown product ids are terminal rejections, never guessed defaults.
//! - Duplicate `(store, transaction_id)` pairs surface the store's
//!   duplicate error unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use paygate_core::ProductCatalog;
use paygate_core::PurchaseRecord;
use paygate_core::PurchaseStore;
use paygate_core::ReceiptState;
use paygate_core::StoreKind;
use paygate_core::StoreProductId;
use paygate_core::Timestamp;
use paygate_core::UserId;
use serde_json::Value;

use crate::error::ReceiptError;

// ============================================================================
// SECTION: Verified Purchases
// ============================================================================

/// One store-verified purchase, ready to be recorded.
///
/// # Invariants
/// - Built only from a response the store endpoint confirmed.
#[derive(Debug, Clone)]
pub struct VerifiedPurchase {
    /// Customer who made the purchase.
    pub user_id: UserId,
    /// Store that confirmed the purchase.
    pub store: StoreKind,
    /// Store product identifier to resolve through the catalog.
    pub product_id: StoreProductId,
    /// Store transaction identifier.
    pub transaction_id: String,
    /// Google Play purchase token, when applicable.
    pub purchase_token: Option<String>,
    /// Purchase time as reported by the store.
    pub purchase_time: Timestamp,
    /// Raw store response retained as the audit blob.
    pub raw_receipt: Value,
}

// ============================================================================
// SECTION: Recorder
// ============================================================================

/// Shared catalog-resolution and store-insert step.
pub struct PurchaseRecorder {
    /// Catalog mapping store products onto unified packages.
    catalog: Arc<dyn ProductCatalog>,
    /// Append-only purchase store.
    store: Arc<dyn PurchaseStore>,
}

impl PurchaseRecorder {
    /// Creates a recorder over the given catalog and store.
    #[must_use]
    pub fn new(catalog: Arc<dyn ProductCatalog>, store: Arc<dyn PurchaseStore>) -> Self {
        Self {
            catalog,
            store,
        }
    }

    /// Resolves the product and writes the purchase record.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Rejected`] for unknown products and forwards
    /// catalog/store faults (including duplicates) unchanged.
    pub fn record(&self, purchase: VerifiedPurchase) -> Result<PurchaseRecord, ReceiptError> {
        let Some(package_id) = self.catalog.resolve(purchase.store, &purchase.product_id)? else {
            let store_label = match purchase.store {
                StoreKind::AppleAppStore => "Apple",
                StoreKind::GooglePlay => "Google",
            };
            return Err(ReceiptError::Rejected(format!(
                "Unknown {store_label} product: {}",
                purchase.product_id
            )));
        };

        let record = PurchaseRecord {
            user_id: purchase.user_id,
            unified_package_id: package_id,
            store: purchase.store,
            transaction_id: purchase.transaction_id,
            purchase_token: purchase.purchase_token,
            purchase_time: purchase.purchase_time,
            status: ReceiptState::Recorded,
            raw_receipt: purchase.raw_receipt,
        };
        self.store.insert(&record)?;
        Ok(record)
    }
}
