// crates/paygate-core/src/core/receipt.rs
// ============================================================================
// Module: Purchase Receipt Model
// Description: Receipt lifecycle states and the append-only purchase record.
// Purpose: Capture verified in-app purchases for the audit trail.
// Dependencies: crate::core::{identifiers, time}, serde, serde_json
// ============================================================================

//! ## Overview
//! In-app purchases move through `Submitted -> Verified -> Recorded`, with
//! `Rejected` as the terminal failure state. Nothing is persisted between
//! states; a [`PurchaseRecord`] is written exactly once, after verification,
//! and never mutated afterwards.
//!
//! Security posture: receipts and store responses are untrusted until the
//! platform endpoint confirms them; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::UnifiedPackageId;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Store Kinds
// ============================================================================

/// App store that issued a purchase receipt.
///
/// # Invariants
/// - Wire forms are stable for persistence and contract matching.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Apple App Store receipts verified via `verifyReceipt`.
    AppleAppStore,
    /// Google Play purchases verified via the Android Publisher API.
    GooglePlay,
}

impl StoreKind {
    /// Returns the stable snake_case label for the store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppleAppStore => "apple_app_store",
            Self::GooglePlay => "google_play",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Receipt Lifecycle
// ============================================================================

/// Lifecycle state of one submitted receipt.
///
/// # Invariants
/// - Legal transitions are `Submitted -> Verified -> Recorded` and
///   `Submitted | Verified -> Rejected`; everything else is refused.
/// - `Recorded` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptState {
    /// Receipt received from the client, not yet checked.
    Submitted,
    /// Platform endpoint confirmed the receipt.
    Verified,
    /// Purchase record written to the store.
    Recorded,
    /// Receipt refused; nothing was persisted.
    Rejected,
}

impl ReceiptState {
    /// Returns true when the state admits no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Recorded | Self::Rejected)
    }

    /// Returns true when `next` is a legal successor of this state.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::Verified)
                | (Self::Verified, Self::Recorded)
                | (Self::Submitted | Self::Verified, Self::Rejected)
        )
    }

    /// Returns the stable snake_case label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Verified => "verified",
            Self::Recorded => "recorded",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReceiptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Purchase Record
// ============================================================================

/// Append-only record of one verified in-app purchase.
///
/// # Invariants
/// - Created once per verified receipt; never mutated after creation.
/// - `(store, transaction_id)` is unique in any conforming store.
/// - `purchase_token` is present for Google Play purchases only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Customer who made the purchase.
    pub user_id: UserId,
    /// Catalog package resolved from the store product identifier.
    pub unified_package_id: UnifiedPackageId,
    /// Store that issued the receipt.
    pub store: StoreKind,
    /// Store transaction identifier (Apple transaction id, Google order id).
    pub transaction_id: String,
    /// Google Play purchase token, retained for later state queries.
    pub purchase_token: Option<String>,
    /// Purchase time as reported by the store.
    pub purchase_time: Timestamp,
    /// Lifecycle state at persistence time (always `Recorded`).
    pub status: ReceiptState,
    /// Raw provider response retained as the audit blob.
    pub raw_receipt: Value,
}
