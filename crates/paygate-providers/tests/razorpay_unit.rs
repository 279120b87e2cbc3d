// crates/paygate-providers/tests/razorpay_unit.rs
// ============================================================================
// Module: Razorpay Verifier Unit Tests
// Description: Signature authentication and order lookup behavior.
// Purpose: Pin the HMAC check, its constant rejection of near-misses, and
//          the paise conversion on the recovered order.
// ============================================================================

//! ## Overview
//! Covers fail-fast parameter validation (zero outbound calls), signature
//! rejection for case-flipped and whitespace-padded values, a property test
//! over arbitrary triples, and the end-to-end scenario with the documented
//! `order_9A9A9A` / `pay_29QQoUBi66xm2f` pair.

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

mod common;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use hmac::Hmac;
use hmac::Mac;
use paygate_core::GatewayCredentials;
use paygate_core::GatewayMode;
use paygate_core::PaymentVerifier;
use paygate_core::ProviderKind;
use paygate_core::VerificationRequest;
use paygate_providers::RazorpayVerifier;
use proptest::prelude::proptest;
use serde_json::json;
use sha2::Sha256;

use crate::common::StubResponse;
use crate::common::StubServer;

/// Computes the callback signature the way Razorpay documents it.
fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Builds the typed request from a raw client payload.
fn razorpay_request(payload: serde_json::Value) -> VerificationRequest {
    VerificationRequest::from_client_payload(ProviderKind::Razorpay, &payload)
}

/// Credentials with the documented test secret, pointed at the stub.
fn razorpay_gateway(endpoint: &str) -> GatewayCredentials {
    GatewayCredentials::new("rzp_test_key", "test_secret", GatewayMode::Sandbox)
        .with_endpoint(endpoint)
}

#[tokio::test]
async fn missing_parameters_decline_without_network_call() {
    let server = StubServer::spawn(vec![]);
    let verifier = RazorpayVerifier::default();
    let gateway = razorpay_gateway(&server.url());

    let payload = json!({"razorpay_order_id": "order_1"});
    let result = verifier.verify(&razorpay_request(payload), &gateway).await.expect("verify");

    assert!(!result.success);
    let message = result.message.expect("declines carry a message");
    assert!(message.starts_with("Missing Razorpay parameters"), "got: {message}");
    assert!(message.contains("order_id=order_1"), "partial values aid debugging: {message}");
    assert!(message.contains("payment_id=<missing>"), "got: {message}");
    assert_eq!(server.hits(), 0, "no outbound call may be made");
}

#[tokio::test]
async fn wrong_signature_declines_without_network_call() {
    let server = StubServer::spawn(vec![]);
    let verifier = RazorpayVerifier::default();
    let gateway = razorpay_gateway(&server.url());

    let payload = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": "0000000000000000000000000000000000000000000000000000000000000000",
    });
    let result = verifier.verify(&razorpay_request(payload), &gateway).await.expect("verify");

    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("Invalid Razorpay signature"));
    assert_eq!(server.hits(), 0, "a forged callback must not reach Razorpay");
}

#[tokio::test]
async fn case_flipped_signature_is_rejected() {
    let server = StubServer::spawn(vec![]);
    let verifier = RazorpayVerifier::default();
    let gateway = razorpay_gateway(&server.url());

    let good = sign("test_secret", "order_1", "pay_1");
    let flipped = good.to_uppercase();
    // All-digit signatures have no case to flip; the pair is then identical
    // and the case check is vacuous, so only assert on a real flip.
    if flipped != good {
        let payload = json!({
            "orderId": "order_1",
            "paymentId": "pay_1",
            "signature": flipped,
        });
        let result = verifier.verify(&razorpay_request(payload), &gateway).await.expect("verify");
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("Invalid Razorpay signature"));
    }
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn whitespace_padded_signature_is_rejected() {
    let server = StubServer::spawn(vec![]);
    let verifier = RazorpayVerifier::default();
    let gateway = razorpay_gateway(&server.url());

    let padded = format!("{} ", sign("test_secret", "order_1", "pay_1"));
    let payload = json!({
        "orderId": "order_1",
        "paymentId": "pay_1",
        "signature": padded,
    });
    let result = verifier.verify(&razorpay_request(payload), &gateway).await.expect("verify");

    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("Invalid Razorpay signature"));
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn valid_signature_recovers_order_details() {
    let server = StubServer::spawn(vec![StubResponse::ok(
        json!({
            "id": "order_9A9A9A",
            "amount": 199900,
            "currency": "INR",
            "notes": {"package": "esim-india-5gb", "email": "customer@example.com"},
        })
        .to_string(),
    )]);
    let verifier = RazorpayVerifier::default();
    let gateway = razorpay_gateway(&server.url());

    let signature = sign("test_secret", "order_9A9A9A", "pay_29QQoUBi66xm2f");
    let payload = json!({
        "razorpay_order_id": "order_9A9A9A",
        "razorpay_payment_id": "pay_29QQoUBi66xm2f",
        "razorpay_signature": signature,
    });
    let result = verifier.verify(&razorpay_request(payload), &gateway).await.expect("verify");

    assert!(result.success);
    assert_eq!(result.provider, ProviderKind::Razorpay);
    assert_eq!(result.reference_id(), Some("order_9A9A9A"));
    assert_eq!(result.payment_id(), Some("pay_29QQoUBi66xm2f"));
    assert_eq!(result.amount, Some(BigDecimal::from_str("1999").expect("literal")));
    assert_eq!(result.currency.as_deref(), Some("INR"));
    assert_eq!(result.metadata.get("package"), Some(&json!("esim-india-5gb")));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1/orders/order_9A9A9A");
    let authorization = requests[0].header("Authorization").expect("basic auth present");
    assert!(authorization.starts_with("Basic "), "got: {authorization}");
}

#[tokio::test]
async fn empty_notes_array_degrades_to_empty_metadata() {
    let server = StubServer::spawn(vec![StubResponse::ok(
        json!({"id": "order_1", "amount": 100, "currency": "INR", "notes": []}).to_string(),
    )]);
    let verifier = RazorpayVerifier::default();
    let gateway = razorpay_gateway(&server.url());

    let signature = sign("test_secret", "order_1", "pay_1");
    let payload = json!({
        "orderId": "order_1",
        "paymentId": "pay_1",
        "signature": signature,
    });
    let result = verifier.verify(&razorpay_request(payload), &gateway).await.expect("verify");

    assert!(result.success);
    assert!(result.metadata.is_empty());
}

proptest! {
    #[test]
    fn only_the_exact_signature_is_accepted(
        order_id in "order_[a-zA-Z0-9]{1,10}",
        payment_id in "pay_[a-zA-Z0-9]{1,10}",
        secret in "[a-zA-Z0-9]{4,24}",
        corrupt_nibble in 0usize..64,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let verifier = RazorpayVerifier::default();
        let gateway = GatewayCredentials::new("rzp_test_key", secret.clone(), GatewayMode::Sandbox);

        let good = sign(&secret, &order_id, &payment_id);
        // Corrupt exactly one hex nibble so the candidate is provably wrong.
        let mut corrupted: Vec<char> = good.chars().collect();
        corrupted[corrupt_nibble] = if corrupted[corrupt_nibble] == '0' { '1' } else { '0' };
        let corrupted: String = corrupted.into_iter().collect();

        let payload = json!({
            "orderId": order_id,
            "paymentId": payment_id,
            "signature": corrupted,
        });
        let request = VerificationRequest::from_client_payload(ProviderKind::Razorpay, &payload);
        let result = runtime
            .block_on(verifier.verify(&request, &gateway))
            .expect("signature mismatch is a result, not an error");
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("Invalid Razorpay signature"));
    }
}
