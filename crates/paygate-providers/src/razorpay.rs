// crates/paygate-providers/src/razorpay.rs
// ============================================================================
// Module: Razorpay Verifier
// Description: Callback signature check plus order lookup.
// Purpose: Authenticate the client callback, then recover order details.
// Dependencies: paygate-core, reqwest, serde, hmac, sha2, subtle, hex
// ============================================================================

//! ## Overview
//! Razorpay hands the client a callback triple (order id, payment id,
//! signature). The signature is an HMAC-SHA256 over `{order_id}|{payment_id}`
//! keyed by the gateway secret; it authenticates the callback but carries no
//! business metadata, so a matching signature is followed by one order fetch
//! to recover amount, currency, and merchant notes. Razorpay reports amounts
//! in paise; the adapter divides by 100 on the way out.
//! Invariants:
//! - All three callback fields are mandatory; any missing declines with zero
//!   network calls.
//! - Signature comparison is constant-time; a mismatch is treated as a
//!   potential forgery and is never retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use hmac::Hmac;
use hmac::Mac;
use paygate_core::GatewayCredentials;
use paygate_core::PaymentVerifier;
use paygate_core::ProviderKind;
use paygate_core::RazorpayRequest;
use paygate_core::TransactionRef;
use paygate_core::VerificationRequest;
use paygate_core::VerificationResult;
use paygate_core::VerifiedMetadata;
use paygate_core::VerifyError;
use paygate_core::minor_units_to_major;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::client;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the Razorpay verifier.
///
/// # Invariants
/// - Live and test keys share one API host; mode only selects credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RazorpayVerifierConfig {
    /// Razorpay API base URL.
    pub api_base: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for RazorpayVerifierConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.razorpay.com".to_string(),
            timeout_ms: client::DEFAULT_TIMEOUT_MS,
            user_agent: client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Minimal order shape; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    /// Amount in paise.
    #[serde(default)]
    amount: i64,
    /// Currency code as Razorpay reports it.
    #[serde(default)]
    currency: Option<String>,
    /// Merchant notes; an empty order serializes them as `[]`, so the shape
    /// is kept loose and non-objects degrade to empty metadata.
    #[serde(default)]
    notes: Value,
}

// ============================================================================
// SECTION: Signature
// ============================================================================

/// HMAC-SHA256 keyed by the gateway secret.
type HmacSha256 = Hmac<Sha256>;

/// Computes the expected callback signature for an order/payment pair.
///
/// # Errors
///
/// Returns [`VerifyError::Configuration`] when the secret cannot key an HMAC.
fn expected_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
) -> Result<String, VerifyError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        VerifyError::Configuration("razorpay secret key unusable for hmac".to_string())
    })?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds the declined message naming which callback fields were present.
fn missing_params_message(request: &RazorpayRequest) -> String {
    let describe = |value: &Option<String>| {
        value.as_deref().map_or_else(|| "<missing>".to_string(), ToString::to_string)
    };
    format!(
        "Missing Razorpay parameters (order_id={}, payment_id={}, signature={})",
        describe(&request.order_id),
        describe(&request.payment_id),
        describe(&request.signature),
    )
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Razorpay callback verifier.
///
/// # Invariants
/// - At most one outbound call per verification, and only after the
///   signature matched.
#[derive(Debug, Clone, Default)]
pub struct RazorpayVerifier {
    /// Verifier configuration.
    config: RazorpayVerifierConfig,
}

impl RazorpayVerifier {
    /// Creates a verifier with the given configuration.
    #[must_use]
    pub fn new(config: RazorpayVerifierConfig) -> Self {
        Self {
            config,
        }
    }
}

#[async_trait]
impl PaymentVerifier for RazorpayVerifier {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Razorpay
    }

    async fn verify(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let VerificationRequest::Razorpay(razorpay) = request else {
            return Err(VerifyError::Configuration(
                "razorpay verifier received a non-razorpay request".to_string(),
            ));
        };
        let (Some(order_id), Some(payment_id), Some(signature)) =
            (razorpay.order_id.as_deref(), razorpay.payment_id.as_deref(), razorpay.signature.as_deref())
        else {
            return Ok(VerificationResult::declined(
                ProviderKind::Razorpay,
                missing_params_message(razorpay),
            ));
        };

        let expected = expected_signature(&gateway.secret_key, order_id, payment_id)?;
        let matches: bool = expected.as_bytes().ct_eq(signature.as_bytes()).into();
        if !matches {
            return Ok(VerificationResult::declined(
                ProviderKind::Razorpay,
                "Invalid Razorpay signature",
            ));
        }

        if !client::is_safe_path_segment(order_id) {
            return Ok(VerificationResult::declined(
                ProviderKind::Razorpay,
                "Invalid Razorpay orderId",
            ));
        }
        let base = client::resolve_base(gateway, &self.config.api_base);
        let url = format!("{base}/v1/orders/{order_id}");
        let http = client::build_client(self.config.timeout_ms, &self.config.user_agent)?;
        let response = http
            .get(url)
            .basic_auth(&gateway.public_key, Some(&gateway.secret_key))
            .send()
            .await
            .map_err(|err| VerifyError::Transport(format!("razorpay request failed: {err}")))?;
        client::ensure_api_success(ProviderKind::Razorpay, response.status())?;
        let order: RazorpayOrder = response.json().await.map_err(|err| {
            VerifyError::MalformedResponse(format!("razorpay order undecodable: {err}"))
        })?;

        let Some(transaction) =
            TransactionRef::new(Some(order_id.to_string()), Some(payment_id.to_string()))
        else {
            return Err(VerifyError::MalformedResponse(
                "razorpay identifiers empty after validation".to_string(),
            ));
        };
        Ok(VerificationResult::approved(
            ProviderKind::Razorpay,
            transaction,
            Some(minor_units_to_major(order.amount)),
            order.currency,
            VerifiedMetadata::from_value(&order.notes),
        ))
    }
}
