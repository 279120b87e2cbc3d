// crates/paygate-core/src/interfaces/mod.rs
// ============================================================================
// Module: PayGate Interfaces
// Description: Backend-agnostic interfaces for verification, catalog, storage.
// Purpose: Define the contract surfaces used by the PayGate runtime crates.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how PayGate integrates with payment providers, the
//! unified catalog, and purchase storage without embedding backend-specific
//! details. Implementations must be stateless across calls and fail closed
//! on missing or invalid data.
//!
//! Security posture: interface implementations consume untrusted inputs; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::identifiers::StoreProductId;
use crate::core::identifiers::UnifiedPackageId;
use crate::core::identifiers::UserId;
use crate::core::provider::GatewayCredentials;
use crate::core::provider::ProviderKind;
use crate::core::receipt::PurchaseRecord;
use crate::core::receipt::StoreKind;
use crate::core::request::VerificationRequest;
use crate::core::result::VerificationResult;

// ============================================================================
// SECTION: Payment Verifier
// ============================================================================

/// Payment verification errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Provider-reported declines are NOT errors; they surface as
///   `success: false` results. Errors cover configuration and transport
///   faults only, so callers can choose a retry policy.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Gateway configuration problem (unknown provider, blocked by policy,
    /// unusable credentials).
    #[error("gateway configuration error: {0}")]
    Configuration(String),
    /// Provider unreachable or the request failed in transit.
    #[error("provider transport error: {0}")]
    Transport(String),
    /// Provider replied with a body this core cannot decode.
    #[error("provider response malformed: {0}")]
    MalformedResponse(String),
}

/// One provider's confirmation protocol reduced to the normalized result.
///
/// Implementations perform at most the prescribed number of outbound calls,
/// build their HTTP client per call from the supplied credentials, and hold
/// no shared mutable state, so concurrent verifications never contend.
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Returns the provider this verifier implements.
    fn provider(&self) -> ProviderKind;

    /// Verifies one client-submitted payment confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] for configuration and transport faults.
    /// Provider-reported declines return `Ok` with `success: false`.
    async fn verify(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError>;
}

// ============================================================================
// SECTION: Product Catalog
// ============================================================================

/// Catalog lookup errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog backend reported an error.
    #[error("catalog lookup error: {0}")]
    Lookup(String),
}

/// Maps store product identifiers onto unified catalog packages.
///
/// An unknown product id resolves to `None`; callers must treat that as a
/// terminal failure rather than guessing a default package.
pub trait ProductCatalog: Send + Sync {
    /// Resolves a store product identifier to a unified package.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog backend fails.
    fn resolve(
        &self,
        store: StoreKind,
        product_id: &StoreProductId,
    ) -> Result<Option<UnifiedPackageId>, CatalogError>;
}

// ============================================================================
// SECTION: Purchase Store
// ============================================================================

/// Purchase store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("purchase store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("purchase store corruption: {0}")]
    Corrupt(String),
    /// A record with the same `(store, transaction_id)` already exists.
    #[error("duplicate purchase record: {0}")]
    Duplicate(String),
    /// Store data is invalid.
    #[error("purchase store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("purchase store error: {0}")]
    Store(String),
}

/// Append-only store for verified purchase records.
///
/// The audit trail never updates rows; the only write is a single insert
/// per verified receipt.
pub trait PurchaseStore: Send + Sync {
    /// Inserts one purchase record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] when `(store, transaction_id)` was
    /// already recorded, and other [`StoreError`] variants on storage faults.
    fn insert(&self, record: &PurchaseRecord) -> Result<(), StoreError>;

    /// Loads a record by store and transaction identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn find_by_transaction(
        &self,
        store: StoreKind,
        transaction_id: &str,
    ) -> Result<Option<PurchaseRecord>, StoreError>;

    /// Lists all records for one user, newest purchase first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when listing fails.
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<PurchaseRecord>, StoreError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
