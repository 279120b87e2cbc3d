// crates/paygate-providers/src/stripe.rs
// ============================================================================
// Module: Stripe Verifier
// Description: Server-side PaymentIntent confirmation.
// Purpose: Retrieve a PaymentIntent and normalize its settlement status.
// Dependencies: paygate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! Stripe verification is a single authenticated retrieve of the
//! PaymentIntent named by the client. Status `succeeded` or `processing`
//! counts as success; `processing` is accepted because some payment methods
//! settle asynchronously. Stripe reports amounts in integer minor units, so
//! the adapter divides by 100 on the way out.
//! Invariants:
//! - A missing or unsafe intent identifier declines before any network call.
//! - `metadata` and `currency` pass through verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use paygate_core::GatewayCredentials;
use paygate_core::PaymentVerifier;
use paygate_core::ProviderKind;
use paygate_core::TransactionRef;
use paygate_core::VerificationRequest;
use paygate_core::VerificationResult;
use paygate_core::VerifiedMetadata;
use paygate_core::VerifyError;
use paygate_core::minor_units_to_major;
use serde::Deserialize;
use serde_json::Value;

use crate::client;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the Stripe verifier.
///
/// # Invariants
/// - `api_base` has no trailing slash requirement; it is normalized on use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeVerifierConfig {
    /// Stripe API base URL. Live and test keys share one host.
    pub api_base: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for StripeVerifierConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.stripe.com".to_string(),
            timeout_ms: client::DEFAULT_TIMEOUT_MS,
            user_agent: client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Minimal PaymentIntent shape; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    /// PaymentIntent identifier.
    id: String,
    /// Settlement status string.
    status: String,
    /// Requested amount in minor units.
    #[serde(default)]
    amount: i64,
    /// Settled amount in minor units; zero until funds arrive.
    #[serde(default)]
    amount_received: i64,
    /// Currency code as Stripe reports it (lowercase).
    #[serde(default)]
    currency: Option<String>,
    /// Merchant metadata map, passed through verbatim.
    #[serde(default)]
    metadata: Value,
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Stripe PaymentIntent verifier.
///
/// # Invariants
/// - Exactly one outbound call per verification, none on invalid input.
#[derive(Debug, Clone, Default)]
pub struct StripeVerifier {
    /// Verifier configuration.
    config: StripeVerifierConfig,
}

impl StripeVerifier {
    /// Creates a verifier with the given configuration.
    #[must_use]
    pub fn new(config: StripeVerifierConfig) -> Self {
        Self {
            config,
        }
    }
}

#[async_trait]
impl PaymentVerifier for StripeVerifier {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Stripe
    }

    async fn verify(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let VerificationRequest::Stripe(stripe) = request else {
            return Err(VerifyError::Configuration(
                "stripe verifier received a non-stripe request".to_string(),
            ));
        };
        let Some(intent_id) = stripe.payment_intent_id.as_deref() else {
            return Ok(VerificationResult::declined(
                ProviderKind::Stripe,
                "Missing Stripe paymentIntentId",
            ));
        };
        if !client::is_safe_path_segment(intent_id) {
            return Ok(VerificationResult::declined(
                ProviderKind::Stripe,
                "Invalid Stripe paymentIntentId",
            ));
        }

        let base = client::resolve_base(gateway, &self.config.api_base);
        let url = format!("{base}/v1/payment_intents/{intent_id}");
        let http = client::build_client(self.config.timeout_ms, &self.config.user_agent)?;
        let response = http
            .get(url)
            .bearer_auth(&gateway.secret_key)
            .send()
            .await
            .map_err(|err| VerifyError::Transport(format!("stripe request failed: {err}")))?;
        client::ensure_api_success(ProviderKind::Stripe, response.status())?;
        let intent: StripePaymentIntent = response.json().await.map_err(|err| {
            VerifyError::MalformedResponse(format!("stripe payment intent undecodable: {err}"))
        })?;

        if intent.status != "succeeded" && intent.status != "processing" {
            return Ok(VerificationResult::declined(
                ProviderKind::Stripe,
                format!("Stripe payment not completed: {}", intent.status),
            ));
        }

        let Some(transaction) = TransactionRef::from_reference(intent.id) else {
            return Err(VerifyError::MalformedResponse(
                "stripe payment intent id missing".to_string(),
            ));
        };
        // amount_received is still zero for processing intents.
        let minor = if intent.amount_received > 0 { intent.amount_received } else { intent.amount };
        Ok(VerificationResult::approved(
            ProviderKind::Stripe,
            transaction,
            Some(minor_units_to_major(minor)),
            intent.currency,
            VerifiedMetadata::from_value(&intent.metadata),
        ))
    }
}
