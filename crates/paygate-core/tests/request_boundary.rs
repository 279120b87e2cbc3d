// crates/paygate-core/tests/request_boundary.rs
// ============================================================================
// Module: Request Boundary Tests
// Description: Alias resolution for the verification request union.
// Purpose: Ensure client field aliases resolve once, at construction.
// ============================================================================

//! ## Overview
//! Exercises `VerificationRequest::from_client_payload` across the naming
//! conventions each provider's client integrations actually send.

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

use paygate_core::ProviderKind;
use paygate_core::VerificationRequest;
use serde_json::json;

#[test]
fn stripe_first_non_empty_alias_wins() {
    let payload = json!({"payment_intent": "pi_alias", "id": "pi_fallback"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Stripe, &payload);
    let VerificationRequest::Stripe(stripe) = request else {
        panic!("expected stripe variant");
    };
    assert_eq!(stripe.payment_intent_id.as_deref(), Some("pi_alias"));
}

#[test]
fn stripe_primary_name_precedes_aliases() {
    let payload = json!({"paymentIntentId": "pi_primary", "payment_intent": "pi_alias"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Stripe, &payload);
    let VerificationRequest::Stripe(stripe) = request else {
        panic!("expected stripe variant");
    };
    assert_eq!(stripe.payment_intent_id.as_deref(), Some("pi_primary"));
}

#[test]
fn stripe_empty_string_is_missing() {
    let payload = json!({"paymentIntentId": "", "id": "pi_fallback"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Stripe, &payload);
    let VerificationRequest::Stripe(stripe) = request else {
        panic!("expected stripe variant");
    };
    assert_eq!(stripe.payment_intent_id.as_deref(), Some("pi_fallback"));
}

#[test]
fn razorpay_webhook_names_resolve() {
    let payload = json!({
        "razorpay_order_id": "order_9A9A9A",
        "razorpay_payment_id": "pay_29QQoUBi66xm2f",
        "razorpay_signature": "deadbeef",
    });
    let request = VerificationRequest::from_client_payload(ProviderKind::Razorpay, &payload);
    let VerificationRequest::Razorpay(razorpay) = request else {
        panic!("expected razorpay variant");
    };
    assert_eq!(razorpay.order_id.as_deref(), Some("order_9A9A9A"));
    assert_eq!(razorpay.payment_id.as_deref(), Some("pay_29QQoUBi66xm2f"));
    assert_eq!(razorpay.signature.as_deref(), Some("deadbeef"));
}

#[test]
fn razorpay_normalized_aliases_resolve() {
    let payload = json!({
        "orderId": "order_1",
        "paymentId": "pay_1",
        "signature": "cafe",
    });
    let request = VerificationRequest::from_client_payload(ProviderKind::Razorpay, &payload);
    let VerificationRequest::Razorpay(razorpay) = request else {
        panic!("expected razorpay variant");
    };
    assert_eq!(razorpay.order_id.as_deref(), Some("order_1"));
    assert_eq!(razorpay.payment_id.as_deref(), Some("pay_1"));
    assert_eq!(razorpay.signature.as_deref(), Some("cafe"));
}

#[test]
fn razorpay_partial_payload_keeps_present_fields() {
    let payload = json!({"razorpay_order_id": "order_1"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Razorpay, &payload);
    let VerificationRequest::Razorpay(razorpay) = request else {
        panic!("expected razorpay variant");
    };
    assert_eq!(razorpay.order_id.as_deref(), Some("order_1"));
    assert_eq!(razorpay.payment_id, None);
    assert_eq!(razorpay.signature, None);
}

#[test]
fn paypal_nested_payload_resolves() {
    let payload = json!({"paypal": {"orderId": "5O190127TN364715T"}});
    let request = VerificationRequest::from_client_payload(ProviderKind::Paypal, &payload);
    let VerificationRequest::Paypal(paypal) = request else {
        panic!("expected paypal variant");
    };
    assert_eq!(paypal.order_id.as_deref(), Some("5O190127TN364715T"));
}

#[test]
fn paypal_flat_snake_case_resolves() {
    let payload = json!({"order_id": "5O190127TN364715T"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Paypal, &payload);
    let VerificationRequest::Paypal(paypal) = request else {
        panic!("expected paypal variant");
    };
    assert_eq!(paypal.order_id.as_deref(), Some("5O190127TN364715T"));
}

#[test]
fn paypal_non_object_nesting_falls_back_to_flat() {
    let payload = json!({"paypal": "not-an-object", "orderId": "5O1"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Paypal, &payload);
    let VerificationRequest::Paypal(paypal) = request else {
        panic!("expected paypal variant");
    };
    assert_eq!(paypal.order_id.as_deref(), Some("5O1"));
}

#[test]
fn paystack_reference_resolves() {
    let payload = json!({"reference": "ref_abc123"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Paystack, &payload);
    let VerificationRequest::Paystack(paystack) = request else {
        panic!("expected paystack variant");
    };
    assert_eq!(paystack.reference.as_deref(), Some("ref_abc123"));
}

#[test]
fn powertranz_token_resolves() {
    let payload = json!({"spiToken": "spi-token-1"});
    let request = VerificationRequest::from_client_payload(ProviderKind::Powertranz, &payload);
    let VerificationRequest::Powertranz(powertranz) = request else {
        panic!("expected powertranz variant");
    };
    assert_eq!(powertranz.spi_token.as_deref(), Some("spi-token-1"));
}

#[test]
fn union_variant_matches_provider_tag() {
    let payload = json!({});
    for provider in paygate_core::ALL_PROVIDERS {
        let request = VerificationRequest::from_client_payload(provider, &payload);
        assert_eq!(request.provider(), provider);
    }
}

#[test]
fn unknown_provider_tag_is_rejected_at_parse() {
    let parsed = "venmo".parse::<ProviderKind>();
    assert!(parsed.is_err());
    let error = parsed.err().map(|err| err.to_string());
    assert_eq!(error.as_deref(), Some("unknown payment provider: venmo"));
}
