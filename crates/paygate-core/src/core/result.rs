// crates/paygate-core/src/core/result.rs
// ============================================================================
// Module: Verification Result
// Description: The normalized outcome shape produced by every verifier.
// Purpose: Give order-fulfillment one result contract regardless of provider.
// Dependencies: crate::core::provider, bigdecimal, serde, serde_json
// ============================================================================

//! ## Overview
//! Every provider verifier reduces its protocol to a [`VerificationResult`].
//! Success always carries a [`TransactionRef`]; the reference type cannot be
//! constructed without at least one non-empty identifier, so the invariant
//! holds by construction rather than by convention. Provider-specific
//! auxiliary fields travel in [`VerifiedMetadata`], which downstream callers
//! read through explicit key access.
//! Invariants:
//! - `success == true` implies `transaction.is_some()`.
//! - `message` is populated only on failure.
//! - Results are handed synchronously to the caller and never persisted here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::provider::ProviderKind;

// ============================================================================
// SECTION: Transaction References
// ============================================================================

/// Provider-assigned identifiers for one payment attempt.
///
/// # Invariants
/// - At least one of `reference_id`, `payment_id` is present and non-empty;
///   construction filters empty values and refuses an all-empty pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRef {
    /// Provider order/intent/transaction reference.
    reference_id: Option<String>,
    /// Provider payment identifier, when distinct from the reference.
    payment_id: Option<String>,
}

impl TransactionRef {
    /// Builds a reference pair, dropping empty strings.
    ///
    /// Returns `None` when neither identifier survives filtering, which is
    /// what keeps "success implies an identifier" true by construction.
    #[must_use]
    pub fn new(reference_id: Option<String>, payment_id: Option<String>) -> Option<Self> {
        let reference_id = reference_id.filter(|id| !id.trim().is_empty());
        let payment_id = payment_id.filter(|id| !id.trim().is_empty());
        if reference_id.is_none() && payment_id.is_none() {
            return None;
        }
        Some(Self {
            reference_id,
            payment_id,
        })
    }

    /// Builds a reference-only pair from a single identifier.
    #[must_use]
    pub fn from_reference(reference_id: impl Into<String>) -> Option<Self> {
        Self::new(Some(reference_id.into()), None)
    }

    /// Returns the provider reference identifier, when present.
    #[must_use]
    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    /// Returns the provider payment identifier, when present.
    #[must_use]
    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }
}

// ============================================================================
// SECTION: Metadata Wrapper
// ============================================================================

/// Provider-defined auxiliary fields carried through for order reconciliation.
///
/// The shape is inherently open (order notes, payer email, merchant JSON),
/// so the wrapper keeps a loose map but forces downstream readers through
/// explicit key access instead of field projection on raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifiedMetadata(BTreeMap<String, Value>);

impl VerifiedMetadata {
    /// Creates an empty metadata map.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Keeps a JSON object as metadata; every other shape degrades to empty.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                Self(map.iter().map(|(key, value)| (key.clone(), value.clone())).collect())
            }
            _ => Self::empty(),
        }
    }

    /// Parses a JSON string into metadata, degrading to empty on parse
    /// failure or non-object JSON. Used for PayPal `custom_id`, which is
    /// merchant-set free text and must never make verification throw.
    #[must_use]
    pub fn from_json_str(raw: &str) -> Self {
        serde_json::from_str::<Value>(raw).map_or_else(|_| Self::empty(), |v| Self::from_value(&v))
    }

    /// Inserts one key, replacing any existing value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Reads one key explicitly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Merges `overrides` into this map; overriding keys win collisions.
    #[must_use]
    pub fn merged_with(mut self, overrides: Self) -> Self {
        for (key, value) in overrides.0 {
            self.0.insert(key, value);
        }
        self
    }

    /// Returns true when no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of keys present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ============================================================================
// SECTION: Verification Result
// ============================================================================

/// Normalized verification outcome, uniform across providers.
///
/// # Invariants
/// - `success == true` implies `transaction.is_some()`; use the constructors.
/// - `amount` is in decimal major currency units (see `core::money`).
/// - `currency` is the provider's code verbatim, with no case normalization.
/// - `message` is populated only on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Whether the provider confirms a completed/accepted payment.
    pub success: bool,
    /// Provider that produced this result.
    pub provider: ProviderKind,
    /// Provider-assigned transaction identifiers (present on success).
    pub transaction: Option<TransactionRef>,
    /// Amount in decimal major currency units, when reported.
    pub amount: Option<BigDecimal>,
    /// ISO currency code as reported by the provider, when available.
    pub currency: Option<String>,
    /// Provider-specific auxiliary fields for order reconciliation.
    pub metadata: VerifiedMetadata,
    /// Human-readable failure reason (failure only).
    pub message: Option<String>,
}

impl VerificationResult {
    /// Builds a successful result.
    #[must_use]
    pub fn approved(
        provider: ProviderKind,
        transaction: TransactionRef,
        amount: Option<BigDecimal>,
        currency: Option<String>,
        metadata: VerifiedMetadata,
    ) -> Self {
        Self {
            success: true,
            provider,
            transaction: Some(transaction),
            amount,
            currency,
            metadata,
            message: None,
        }
    }

    /// Builds a failed result carrying a human-readable reason.
    #[must_use]
    pub fn declined(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            provider,
            transaction: None,
            amount: None,
            currency: None,
            metadata: VerifiedMetadata::empty(),
            message: Some(message.into()),
        }
    }

    /// Returns the provider reference identifier, when present.
    #[must_use]
    pub fn reference_id(&self) -> Option<&str> {
        self.transaction.as_ref().and_then(TransactionRef::reference_id)
    }

    /// Returns the provider payment identifier, when present.
    #[must_use]
    pub fn payment_id(&self) -> Option<&str> {
        self.transaction.as_ref().and_then(TransactionRef::payment_id)
    }
}
