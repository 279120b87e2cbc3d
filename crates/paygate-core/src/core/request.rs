// crates/paygate-core/src/core/request.rs
// ============================================================================
// Module: Verification Request Union
// Description: Typed per-provider verification request payloads.
// Purpose: Resolve client field aliases once, at the construction boundary.
// Dependencies: crate::core::provider, serde, serde_json
// ============================================================================

//! ## Overview
//! Clients submit loosely shaped confirmation payloads whose field names vary
//! by integration age (`paymentIntentId` vs `payment_intent`, webhook-style
//! `razorpay_order_id` vs normalized `orderId`). PayGate resolves every alias
//! exactly once, when the raw payload is turned into this closed union;
//! verifiers see only the canonical fields.
//! Invariants:
//! - Alias resolution lives here and nowhere else.
//! - Empty strings are treated as missing values.
//! - Missing fields survive as `None` so verifiers can fail fast with the
//!   field-naming messages the caller contract requires.
//!
//! Security posture: payloads are untrusted client input; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::provider::ProviderKind;

// ============================================================================
// SECTION: Per-Provider Requests
// ============================================================================

/// Stripe verification request.
///
/// # Invariants
/// - `payment_intent_id` is the resolved value of the first non-empty of
///   `paymentIntentId`, `payment_intent`, `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeRequest {
    /// PaymentIntent identifier to confirm server-side.
    pub payment_intent_id: Option<String>,
}

/// Razorpay verification request.
///
/// # Invariants
/// - Webhook-style names (`razorpay_*`) take precedence over normalized
///   aliases when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RazorpayRequest {
    /// Razorpay order identifier.
    pub order_id: Option<String>,
    /// Razorpay payment identifier.
    pub payment_id: Option<String>,
    /// Callback signature over `{order_id}|{payment_id}`.
    pub signature: Option<String>,
}

/// PayPal verification request.
///
/// # Invariants
/// - `order_id` is resolved from a flat payload or one nested under `paypal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaypalRequest {
    /// Checkout order identifier to look up.
    pub order_id: Option<String>,
}

/// Paystack verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaystackRequest {
    /// Transaction reference to verify.
    pub reference: Option<String>,
}

/// PowerTranz verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowertranzRequest {
    /// SPI token issued by the client-side payment widget.
    pub spi_token: Option<String>,
}

// ============================================================================
// SECTION: Request Union
// ============================================================================

/// Closed union of verification requests, one variant per provider.
///
/// # Invariants
/// - The variant always matches the provider tag used at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum VerificationRequest {
    /// Stripe PaymentIntent confirmation.
    Stripe(StripeRequest),
    /// Razorpay signature check plus order lookup.
    Razorpay(RazorpayRequest),
    /// PayPal order lookup.
    Paypal(PaypalRequest),
    /// Paystack transaction lookup.
    Paystack(PaystackRequest),
    /// PowerTranz SPI payment.
    Powertranz(PowertranzRequest),
}

impl VerificationRequest {
    /// Builds the typed request for `provider` from a raw client payload,
    /// resolving every accepted field alias.
    #[must_use]
    pub fn from_client_payload(provider: ProviderKind, payload: &Value) -> Self {
        match provider {
            ProviderKind::Stripe => Self::Stripe(StripeRequest {
                payment_intent_id: first_string(
                    payload,
                    &["paymentIntentId", "payment_intent", "id"],
                ),
            }),
            ProviderKind::Razorpay => Self::Razorpay(RazorpayRequest {
                order_id: first_string(payload, &["razorpay_order_id", "orderId"]),
                payment_id: first_string(payload, &["razorpay_payment_id", "paymentId"]),
                signature: first_string(payload, &["razorpay_signature", "signature"]),
            }),
            ProviderKind::Paypal => {
                let body = nested_object(payload, "paypal");
                Self::Paypal(PaypalRequest {
                    order_id: first_string(body, &["orderId", "order_id"]),
                })
            }
            ProviderKind::Paystack => Self::Paystack(PaystackRequest {
                reference: first_string(payload, &["reference"]),
            }),
            ProviderKind::Powertranz => Self::Powertranz(PowertranzRequest {
                spi_token: first_string(payload, &["spiToken"]),
            }),
        }
    }

    /// Returns the provider tag this request targets.
    #[must_use]
    pub const fn provider(&self) -> ProviderKind {
        match self {
            Self::Stripe(_) => ProviderKind::Stripe,
            Self::Razorpay(_) => ProviderKind::Razorpay,
            Self::Paypal(_) => ProviderKind::Paypal,
            Self::Paystack(_) => ProviderKind::Paystack,
            Self::Powertranz(_) => ProviderKind::Powertranz,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the first non-empty string value among `keys`, in order.
///
/// Values are returned verbatim (no trimming): a signature padded with
/// whitespace must reach the comparison and fail there, not be repaired
/// at the boundary.
fn first_string(payload: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(Value::String(raw)) = payload.get(key) {
            if !raw.trim().is_empty() {
                return Some(raw.clone());
            }
        }
    }
    None
}

/// Returns the object nested under `key` when present, else the payload itself.
fn nested_object<'a>(payload: &'a Value, key: &str) -> &'a Value {
    match payload.get(key) {
        Some(inner) if inner.is_object() => inner,
        _ => payload,
    }
}
