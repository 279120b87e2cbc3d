// crates/paygate-core/tests/result_unit.rs
// ============================================================================
// Module: Verification Result Tests
// Description: Invariants of the normalized result and metadata wrapper.
// Purpose: Ensure success always carries an identifier and metadata degrades safely.
// ============================================================================

//! ## Overview
//! Covers the construction-boundary invariant of `TransactionRef`, metadata
//! merge precedence, and the exact minor-unit money conversions.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::str::FromStr;

use bigdecimal::BigDecimal;
use paygate_core::ProviderKind;
use paygate_core::TransactionRef;
use paygate_core::VerificationResult;
use paygate_core::VerifiedMetadata;
use paygate_core::minor_units_to_major;
use paygate_core::parse_decimal_amount;
use serde_json::json;

#[test]
fn transaction_ref_refuses_all_empty_pairs() {
    assert!(TransactionRef::new(None, None).is_none());
    assert!(TransactionRef::new(Some(String::new()), Some("  ".to_string())).is_none());
}

#[test]
fn transaction_ref_drops_empty_side() {
    let txn = TransactionRef::new(Some("order_1".to_string()), Some(String::new()))
        .expect("one identifier survives");
    assert_eq!(txn.reference_id(), Some("order_1"));
    assert_eq!(txn.payment_id(), None);
}

#[test]
fn approved_result_always_exposes_an_identifier() {
    let txn = TransactionRef::from_reference("pi_123").expect("non-empty reference");
    let result = VerificationResult::approved(
        ProviderKind::Stripe,
        txn,
        None,
        None,
        VerifiedMetadata::empty(),
    );
    assert!(result.success);
    assert!(result.reference_id().is_some() || result.payment_id().is_some());
    assert_eq!(result.message, None);
}

#[test]
fn declined_result_carries_message_only() {
    let result = VerificationResult::declined(ProviderKind::Paystack, "Missing Paystack reference");
    assert!(!result.success);
    assert!(result.transaction.is_none());
    assert_eq!(result.message.as_deref(), Some("Missing Paystack reference"));
}

#[test]
fn metadata_from_value_keeps_objects_only() {
    let object = json!({"plan": "esim-10gb", "region": "EU"});
    let metadata = VerifiedMetadata::from_value(&object);
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata.get("plan"), Some(&json!("esim-10gb")));

    assert!(VerifiedMetadata::from_value(&json!([1, 2, 3])).is_empty());
    assert!(VerifiedMetadata::from_value(&json!("text")).is_empty());
    assert!(VerifiedMetadata::from_value(&json!(null)).is_empty());
}

#[test]
fn metadata_from_json_str_degrades_on_garbage() {
    assert!(VerifiedMetadata::from_json_str("{not json").is_empty());
    assert!(VerifiedMetadata::from_json_str("42").is_empty());
    let parsed = VerifiedMetadata::from_json_str(r#"{"orderRef":"A-77"}"#);
    assert_eq!(parsed.get("orderRef"), Some(&json!("A-77")));
}

#[test]
fn metadata_merge_gives_overrides_precedence() {
    let mut base = VerifiedMetadata::empty();
    base.insert("email", json!("customer@example.com"));
    base.insert("channel", json!("web"));

    let mut overrides = VerifiedMetadata::empty();
    overrides.insert("channel", json!("mobile"));

    let merged = base.merged_with(overrides);
    assert_eq!(merged.get("email"), Some(&json!("customer@example.com")));
    assert_eq!(merged.get("channel"), Some(&json!("mobile")));
}

#[test]
fn minor_units_convert_exactly() {
    assert_eq!(minor_units_to_major(1999), BigDecimal::from_str("19.99").expect("literal"));
    assert_eq!(minor_units_to_major(100), BigDecimal::from_str("1").expect("literal"));
    assert_eq!(minor_units_to_major(1), BigDecimal::from_str("0.01").expect("literal"));
    assert_eq!(minor_units_to_major(0), BigDecimal::from_str("0").expect("literal"));
}

#[test]
fn decimal_amounts_parse_exactly() {
    assert_eq!(
        parse_decimal_amount("19.99"),
        Some(BigDecimal::from_str("19.99").expect("literal"))
    );
    assert_eq!(parse_decimal_amount(" 5.00 "), Some(BigDecimal::from_str("5.00").expect("literal")));
    assert_eq!(parse_decimal_amount(""), None);
    assert_eq!(parse_decimal_amount("not-a-number"), None);
}
