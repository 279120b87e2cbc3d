// crates/paygate-core/src/lib.rs
// ============================================================================
// Module: PayGate Core
// Description: Canonical domain model and interfaces for payment verification.
// Purpose: Define provider tags, request/result shapes, and contract surfaces.
// Dependencies: serde, serde_json, bigdecimal, thiserror, async-trait
// ============================================================================

//! ## Overview
//! This crate defines the canonical model shared by every PayGate crate:
//! provider tags, the typed verification request union, the normalized
//! [`VerificationResult`], decimal money handling, the purchase receipt
//! state machine, and the backend-agnostic interfaces for verifiers,
//! product catalogs, and purchase stores.
//! Invariants:
//! - A successful [`VerificationResult`] always carries a transaction
//!   reference; [`TransactionRef`] cannot be built without one.
//! - Amounts are decimal major currency units; minor-unit conversion happens
//!   at adapter boundaries, never downstream.
//!
//! Security posture: client payloads and provider responses are untrusted;
//! see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::StaticCatalog;
pub use core::identifiers::StoreProductId;
pub use core::identifiers::UnifiedPackageId;
pub use core::identifiers::UserId;
pub use core::money::minor_units_to_major;
pub use core::money::parse_decimal_amount;
pub use core::provider::ALL_PROVIDERS;
pub use core::provider::GatewayCredentials;
pub use core::provider::GatewayMode;
pub use core::provider::ProviderKind;
pub use core::provider::UnknownProviderError;
pub use core::receipt::PurchaseRecord;
pub use core::receipt::ReceiptState;
pub use core::receipt::StoreKind;
pub use core::request::PaypalRequest;
pub use core::request::PaystackRequest;
pub use core::request::PowertranzRequest;
pub use core::request::RazorpayRequest;
pub use core::request::StripeRequest;
pub use core::request::VerificationRequest;
pub use core::result::TransactionRef;
pub use core::result::VerificationResult;
pub use core::result::VerifiedMetadata;
pub use core::time::Timestamp;
pub use interfaces::CatalogError;
pub use interfaces::PaymentVerifier;
pub use interfaces::ProductCatalog;
pub use interfaces::PurchaseStore;
pub use interfaces::StoreError;
pub use interfaces::VerifyError;
