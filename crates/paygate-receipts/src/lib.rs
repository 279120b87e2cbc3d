// crates/paygate-receipts/src/lib.rs
// ============================================================================
// Module: PayGate Receipts
// Description: Apple and Google Play in-app purchase verification services.
// Purpose: Verify store receipts and record append-only purchase rows.
// Dependencies: paygate-core, reqwest, serde, base64, thiserror
// ============================================================================

//! ## Overview
//! This crate ships the two receipt verification services. Each purchase
//! moves through `Submitted -> Verified -> Recorded`, with `Rejected` as the
//! terminal failure; nothing is persisted between states and a failed
//! verification simply returns an error (retries are the caller's concern).
//! The only automatic retry in all of PayGate is Apple's bounded sandbox
//! fallback on status 21007.
//! Invariants:
//! - Store product ids resolve through the catalog; unknown products are
//!   terminal failures, never guessed defaults.
//! - Purchase records are written exactly once, after verification.
//!
//! Security posture: receipts and store responses are untrusted; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod apple;
mod client;
pub mod error;
pub mod google;
pub mod recorder;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use apple::AppleReceiptConfig;
pub use apple::AppleReceiptService;
pub use error::ReceiptError;
pub use google::GoogleReceiptConfig;
pub use google::GoogleReceiptService;
pub use recorder::PurchaseRecorder;
