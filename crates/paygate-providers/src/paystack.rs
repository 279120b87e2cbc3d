// crates/paygate-providers/src/paystack.rs
// ============================================================================
// Module: Paystack Verifier
// Description: Transaction verification by reference.
// Purpose: Confirm a Paystack transaction reached success.
// Dependencies: paygate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! Paystack verification is a single authenticated GET of the transaction
//! named by its reference. The envelope's `data.status` must equal
//! `"success"`. Metadata merges the customer's email with the transaction's
//! own metadata map; the transaction map wins key collisions because it is
//! the fresher, merchant-controlled source. Paystack reports amounts in
//! kobo; the adapter divides by 100 on the way out.
//! Invariants:
//! - A missing reference or missing gateway secret declines with zero
//!   network calls.

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
use serde_json::json;

use crate::client;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the Paystack verifier.
///
/// # Invariants
/// - Live and test keys share one API host; mode only selects credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaystackVerifierConfig {
    /// Paystack API base URL.
    pub api_base: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for PaystackVerifierConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.paystack.co".to_string(),
            timeout_ms: client::DEFAULT_TIMEOUT_MS,
            user_agent: client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Paystack response envelope.
#[derive(Debug, Deserialize)]
struct PaystackEnvelope {
    /// Whether the API call itself succeeded.
    #[serde(default)]
    status: bool,
    /// API-level message for failed calls.
    #[serde(default)]
    message: Option<String>,
    /// The transaction, when the call succeeded.
    #[serde(default)]
    data: Option<PaystackTransaction>,
}

/// Minimal transaction shape; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct PaystackTransaction {
    /// Numeric transaction identifier.
    #[serde(default)]
    id: Option<i64>,
    /// Transaction status string (`success`, `failed`, `abandoned`, ...).
    status: String,
    /// Transaction reference as echoed by Paystack.
    #[serde(default)]
    reference: Option<String>,
    /// Amount in kobo.
    #[serde(default)]
    amount: i64,
    /// Currency code as Paystack reports it.
    #[serde(default)]
    currency: Option<String>,
    /// Customer block carrying the payer email.
    #[serde(default)]
    customer: Option<PaystackCustomer>,
    /// Transaction metadata; merchants send arbitrary shapes here.
    #[serde(default)]
    metadata: Value,
}

/// Customer block of a transaction.
#[derive(Debug, Deserialize)]
struct PaystackCustomer {
    /// Payer email address.
    #[serde(default)]
    email: Option<String>,
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Paystack transaction verifier.
///
/// # Invariants
/// - Exactly one outbound call per verification, none on invalid input.
#[derive(Debug, Clone, Default)]
pub struct PaystackVerifier {
    /// Verifier configuration.
    config: PaystackVerifierConfig,
}

impl PaystackVerifier {
    /// Creates a verifier with the given configuration.
    #[must_use]
    pub fn new(config: PaystackVerifierConfig) -> Self {
        Self {
            config,
        }
    }
}

#[async_trait]
impl PaymentVerifier for PaystackVerifier {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Paystack
    }

    async fn verify(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let VerificationRequest::Paystack(paystack) = request else {
            return Err(VerifyError::Configuration(
                "paystack verifier received a non-paystack request".to_string(),
            ));
        };
        let Some(reference) = paystack.reference.as_deref() else {
            return Ok(VerificationResult::declined(
                ProviderKind::Paystack,
                "Missing Paystack reference",
            ));
        };
        if gateway.secret_key.trim().is_empty() {
            return Ok(VerificationResult::declined(
                ProviderKind::Paystack,
                "Missing Paystack secret key",
            ));
        }
        if !client::is_safe_path_segment(reference) {
            return Ok(VerificationResult::declined(
                ProviderKind::Paystack,
                "Invalid Paystack reference",
            ));
        }

        let base = client::resolve_base(gateway, &self.config.api_base);
        let url = format!("{base}/transaction/verify/{reference}");
        let http = client::build_client(self.config.timeout_ms, &self.config.user_agent)?;
        let response = http
            .get(url)
            .bearer_auth(&gateway.secret_key)
            .send()
            .await
            .map_err(|err| VerifyError::Transport(format!("paystack request failed: {err}")))?;
        client::ensure_api_success(ProviderKind::Paystack, response.status())?;
        let envelope: PaystackEnvelope = response.json().await.map_err(|err| {
            VerifyError::MalformedResponse(format!("paystack envelope undecodable: {err}"))
        })?;

        let Some(transaction) = envelope.data else {
            let reason = envelope
                .message
                .filter(|_| !envelope.status)
                .unwrap_or_else(|| "Paystack transaction not found".to_string());
            return Ok(VerificationResult::declined(ProviderKind::Paystack, reason));
        };
        if transaction.status != "success" {
            return Ok(VerificationResult::declined(
                ProviderKind::Paystack,
                format!("Paystack transaction not successful: {}", transaction.status),
            ));
        }

        // Transaction metadata is spread last so it wins over the email key.
        let mut metadata = VerifiedMetadata::empty();
        if let Some(email) = transaction.customer.and_then(|customer| customer.email) {
            metadata.insert("email", json!(email));
        }
        let metadata = metadata.merged_with(VerifiedMetadata::from_value(&transaction.metadata));

        let reference_id = transaction.reference.unwrap_or_else(|| reference.to_string());
        let Some(txn) =
            TransactionRef::new(Some(reference_id), transaction.id.map(|id| id.to_string()))
        else {
            return Err(VerifyError::MalformedResponse(
                "paystack transaction reference missing".to_string(),
            ));
        };
        Ok(VerificationResult::approved(
            ProviderKind::Paystack,
            txn,
            Some(minor_units_to_major(transaction.amount)),
            transaction.currency,
            metadata,
        ))
    }
}
