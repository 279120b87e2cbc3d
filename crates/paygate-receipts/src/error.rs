// crates/paygate-receipts/src/error.rs
// ============================================================================
// Module: Receipt Errors
// Description: Error taxonomy for receipt verification and recording.
// Purpose: Separate terminal rejections from transport and storage faults.
// Dependencies: paygate-core, thiserror
// ============================================================================

//! ## Overview
//! Receipt failures split into terminal rejections (invalid receipt, unknown
//! product, payment not completed), transport faults a caller may retry, and
//! catalog/store faults forwarded from the collaborating interfaces.

// ============================================================================
// SECTION: Imports
// ============================================================================

use paygate_core::CatalogError;
use paygate_core::StoreError;
use thiserror::Error;

// ============================================================================
// SECTION: Receipt Errors
// ============================================================================

/// Receipt verification and recording errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Rejected` is terminal; retrying the same receipt cannot succeed.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The store refused the receipt or the product is unknown; terminal.
    #[error("receipt rejected: {0}")]
    Rejected(String),
    /// Store endpoint unreachable or the request failed in transit.
    #[error("receipt transport error: {0}")]
    Transport(String),
    /// Store endpoint replied with a body this core cannot decode.
    #[error("receipt response malformed: {0}")]
    MalformedResponse(String),
    /// Catalog lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Purchase store failed; duplicates surface unchanged.
    #[error("purchase store error: {0}")]
    Store(#[from] StoreError),
}
