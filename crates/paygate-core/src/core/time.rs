// crates/paygate-core/src/core/time.rs
// ============================================================================
// Module: PayGate Time Model
// Description: Canonical timestamp representation for purchase records.
// Purpose: Carry provider-reported purchase times without reading the clock.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Purchase times come from provider payloads (Apple `purchase_date_ms`,
//! Google `purchaseTimeMillis`); the core never reads wall-clock time
//! directly. Tests and deterministic callers may use logical time instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp stored on purchase records.
///
/// # Invariants
/// - Values are explicitly provided by callers or provider payloads; the
///   core never reads wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }
}
