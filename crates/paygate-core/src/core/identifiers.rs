// crates/paygate-core/src/core/identifiers.rs
// ============================================================================
// Module: PayGate Identifiers
// Description: Canonical opaque identifiers for customers and catalog entries.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the identifiers shared by the receipt services and the
//! purchase store. Identifiers are opaque and serialize as numbers or strings
//! on the wire. Numeric identifiers enforce non-zero, 1-based invariants at
//! construction boundaries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Customer identifier owning a verified purchase.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(NonZeroU64);

impl UserId {
    /// Creates a new user identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a user identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

/// Identifier of a package in the unified eSIM catalog.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnifiedPackageId(String);

impl UnifiedPackageId {
    /// Creates a new unified package identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnifiedPackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UnifiedPackageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UnifiedPackageId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Product identifier as registered in an app store.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreProductId(String);

impl StoreProductId {
    /// Creates a new store product identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for StoreProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StoreProductId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
