// crates/paygate-providers/src/powertranz.rs
// ============================================================================
// Module: PowerTranz Verifier
// Description: SPI token settlement against the PowerTranz gateway.
// Purpose: Post the widget-issued token and check the dual approval gate.
// Dependencies: paygate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! The client-side PowerTranz widget issues an SPI token; verification posts
//! that token to the SPI payment endpoint. Protocol quirk: the body is the
//! token as a JSON-encoded bare string, not an object. Success requires both
//! `Approved == true` and `IsoResponseCode == "00"`; PowerTranz can approve
//! with a non-"00" code in edge cases, so the gates are checked literally
//! and independently.
//! Invariants:
//! - A missing token declines with zero network calls.
//! - Both approval gates must hold; neither alone is sufficient.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use paygate_core::GatewayCredentials;
use paygate_core::GatewayMode;
use paygate_core::PaymentVerifier;
use paygate_core::ProviderKind;
use paygate_core::TransactionRef;
use paygate_core::VerificationRequest;
use paygate_core::VerificationResult;
use paygate_core::VerifiedMetadata;
use paygate_core::VerifyError;
use paygate_core::parse_decimal_amount;
use serde::Deserialize;
use serde_json::Number;
use serde_json::json;

use crate::client;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the PowerTranz verifier.
///
/// # Invariants
/// - `live_base` serves `mode == live`, `sandbox_base` everything else; a
///   gateway endpoint override takes precedence over both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowertranzVerifierConfig {
    /// Production gateway base URL.
    pub live_base: String,
    /// Staging gateway base URL.
    pub sandbox_base: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for PowertranzVerifierConfig {
    fn default() -> Self {
        Self {
            live_base: "https://gateway.ptranz.com".to_string(),
            sandbox_base: "https://staging.ptranz.com".to_string(),
            timeout_ms: client::DEFAULT_TIMEOUT_MS,
            user_agent: client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PowertranzVerifierConfig {
    /// Returns the mode-selected base URL.
    #[must_use]
    pub fn base_for_mode(&self, mode: GatewayMode) -> &str {
        match mode {
            GatewayMode::Live => &self.live_base,
            GatewayMode::Sandbox => &self.sandbox_base,
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Minimal SPI payment response; unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PowertranzResponse {
    /// Whether the gateway approved the payment.
    #[serde(default)]
    approved: bool,
    /// ISO 8583 response code; `"00"` is the only full approval.
    #[serde(default)]
    iso_response_code: Option<String>,
    /// Human-readable response message.
    #[serde(default)]
    response_message: Option<String>,
    /// Merchant order identifier echoed by the gateway.
    #[serde(default)]
    order_identifier: Option<String>,
    /// Issuer authorization code.
    #[serde(default)]
    authorization_code: Option<String>,
    /// Retrieval reference number.
    #[serde(default, rename = "RRN")]
    rrn: Option<String>,
    /// Settled amount in decimal major units.
    #[serde(default)]
    total_amount: Option<Number>,
    /// ISO numeric currency code as the gateway reports it.
    #[serde(default)]
    currency_code: Option<String>,
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// PowerTranz SPI payment verifier.
///
/// # Invariants
/// - Exactly one outbound call per verification, none on invalid input.
#[derive(Debug, Clone, Default)]
pub struct PowertranzVerifier {
    /// Verifier configuration.
    config: PowertranzVerifierConfig,
}

impl PowertranzVerifier {
    /// Creates a verifier with the given configuration.
    #[must_use]
    pub fn new(config: PowertranzVerifierConfig) -> Self {
        Self {
            config,
        }
    }
}

#[async_trait]
impl PaymentVerifier for PowertranzVerifier {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Powertranz
    }

    async fn verify(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let VerificationRequest::Powertranz(powertranz) = request else {
            return Err(VerifyError::Configuration(
                "powertranz verifier received a non-powertranz request".to_string(),
            ));
        };
        let Some(spi_token) = powertranz.spi_token.as_deref() else {
            return Ok(VerificationResult::declined(
                ProviderKind::Powertranz,
                "Missing PowerTranz spiToken",
            ));
        };

        let configured = self.config.base_for_mode(gateway.mode);
        let base = client::resolve_base(gateway, configured);
        let http = client::build_client(self.config.timeout_ms, &self.config.user_agent)?;
        // The SPI endpoint takes the token as a JSON-encoded bare string.
        let response = http
            .post(format!("{base}/api/spi/payment"))
            .header("PowerTranz-PowerTranzId", &gateway.public_key)
            .header("PowerTranz-PowerTranzPassword", &gateway.secret_key)
            .json(&spi_token)
            .send()
            .await
            .map_err(|err| VerifyError::Transport(format!("powertranz request failed: {err}")))?;
        client::ensure_api_success(ProviderKind::Powertranz, response.status())?;
        let payment: PowertranzResponse = response.json().await.map_err(|err| {
            VerifyError::MalformedResponse(format!("powertranz response undecodable: {err}"))
        })?;

        let iso_code = payment.iso_response_code.as_deref().unwrap_or("");
        if !(payment.approved && iso_code == "00") {
            let reason = payment.response_message.as_deref().unwrap_or("declined");
            let code = if iso_code.is_empty() { "none" } else { iso_code };
            return Ok(VerificationResult::declined(
                ProviderKind::Powertranz,
                format!("PowerTranz payment not approved: {reason} (iso {code})"),
            ));
        }

        let Some(transaction) = TransactionRef::new(payment.order_identifier, payment.rrn) else {
            return Err(VerifyError::MalformedResponse(
                "powertranz response missing transaction identifiers".to_string(),
            ));
        };
        let mut metadata = VerifiedMetadata::empty();
        if let Some(auth_code) = payment.authorization_code {
            metadata.insert("authorization_code", json!(auth_code));
        }
        let amount =
            payment.total_amount.and_then(|amount| parse_decimal_amount(&amount.to_string()));
        Ok(VerificationResult::approved(
            ProviderKind::Powertranz,
            transaction,
            amount,
            payment.currency_code,
            metadata,
        ))
    }
}
