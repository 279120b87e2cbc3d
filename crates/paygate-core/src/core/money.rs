// crates/paygate-core/src/core/money.rs
// ============================================================================
// Module: PayGate Money Model
// Description: Decimal amount normalization helpers.
// Purpose: Convert provider-native amount units into canonical major units.
// Dependencies: bigdecimal
// ============================================================================

//! ## Overview
//! Providers disagree on amount units: Stripe, Razorpay, and Paystack report
//! integer minor units (cents, paise, kobo), PayPal reports a decimal string,
//! and PowerTranz reports a decimal number. PayGate normalizes every amount
//! to decimal major currency units at the adapter boundary so downstream
//! order logic only ever sees one convention.
//! Invariants:
//! - Minor-unit conversion is exact (scale arithmetic, no floating point).
//! - Conversion happens in verifiers only; results never carry minor units.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minor units per major currency unit for the supported providers.
///
/// All five providers that report integer amounts use two-decimal
/// currencies in the unified catalog, so the factor is fixed.
const MINOR_UNITS_PER_MAJOR: i64 = 100;

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Converts an integer minor-unit amount into decimal major units.
///
/// `1999` minor units become `19.99` major units, exactly.
#[must_use]
pub fn minor_units_to_major(minor: i64) -> BigDecimal {
    BigDecimal::from(minor) / BigDecimal::from(MINOR_UNITS_PER_MAJOR)
}

/// Parses a provider-reported decimal amount string.
///
/// Returns `None` for empty or non-numeric input; callers decide whether a
/// missing amount is a malformed response or an acceptable absence.
#[must_use]
pub fn parse_decimal_amount(raw: &str) -> Option<BigDecimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    BigDecimal::from_str(trimmed).ok()
}
