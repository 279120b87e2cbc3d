// crates/paygate-providers/src/paypal.rs
// ============================================================================
// Module: PayPal Verifier
// Description: OAuth token exchange followed by checkout order lookup.
// Purpose: Confirm a checkout order reached COMPLETED.
// Dependencies: paygate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! PayPal verification is two sequential calls: a client-credentials token
//! exchange, then an order retrieve using the bearer token. The token call
//! must complete before the lookup; the two are never parallelized. Only
//! order status `COMPLETED` is a success; `APPROVED`, `VOIDED`, and friends
//! decline with the actual status so the caller can tell them apart. PayPal
//! reports decimal major units already, so no scaling is applied. Merchant
//! metadata rides in the first purchase unit's `custom_id` as JSON; parse
//! failures degrade to empty metadata and never abort verification.
//! Invariants:
//! - The live/sandbox base URL follows the configured gateway mode.
//! - A missing order id declines before any network call.

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

use crate::client;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the PayPal verifier.
///
/// # Invariants
/// - `live_base` serves `mode == live`, `sandbox_base` everything else; a
///   gateway endpoint override takes precedence over both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaypalVerifierConfig {
    /// Production API base URL.
    pub live_base: String,
    /// Sandbox API base URL.
    pub sandbox_base: String,
    /// Request timeout in milliseconds (applies to each of the two calls).
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for PaypalVerifierConfig {
    fn default() -> Self {
        Self {
            live_base: "https://api-m.paypal.com".to_string(),
            sandbox_base: "https://api-m.sandbox.paypal.com".to_string(),
            timeout_ms: client::DEFAULT_TIMEOUT_MS,
            user_agent: client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PaypalVerifierConfig {
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

/// OAuth token exchange response.
#[derive(Debug, Deserialize)]
struct PaypalTokenResponse {
    /// Bearer token for the order lookup.
    access_token: String,
}

/// Minimal checkout order shape; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct PaypalOrder {
    /// Order identifier.
    id: String,
    /// Order status string (`COMPLETED`, `APPROVED`, `VOIDED`, ...).
    status: String,
    /// Purchase units; the first carries amount and merchant metadata.
    #[serde(default)]
    purchase_units: Vec<PaypalPurchaseUnit>,
}

/// One purchase unit of a checkout order.
#[derive(Debug, Deserialize)]
struct PaypalPurchaseUnit {
    /// Monetary amount of the unit.
    #[serde(default)]
    amount: Option<PaypalAmount>,
    /// Merchant-set free text, JSON by convention in this product.
    #[serde(default)]
    custom_id: Option<String>,
}

/// Amount of a purchase unit, reported in decimal major units.
#[derive(Debug, Deserialize)]
struct PaypalAmount {
    /// ISO currency code.
    #[serde(default)]
    currency_code: Option<String>,
    /// Decimal amount string.
    #[serde(default)]
    value: Option<String>,
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// PayPal checkout order verifier.
///
/// # Invariants
/// - Exactly two outbound calls per verification (token, then order), in
///   that order; none on invalid input.
#[derive(Debug, Clone, Default)]
pub struct PaypalVerifier {
    /// Verifier configuration.
    config: PaypalVerifierConfig,
}

impl PaypalVerifier {
    /// Creates a verifier with the given configuration.
    #[must_use]
    pub fn new(config: PaypalVerifierConfig) -> Self {
        Self {
            config,
        }
    }

    /// Exchanges gateway credentials for an OAuth bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Configuration`] when PayPal refuses the
    /// credentials and [`VerifyError::Transport`] on transit faults.
    async fn fetch_access_token(
        &self,
        http: &reqwest::Client,
        base: &str,
        gateway: &GatewayCredentials,
    ) -> Result<String, VerifyError> {
        let response = http
            .post(format!("{base}/v1/oauth2/token"))
            .basic_auth(&gateway.public_key, Some(&gateway.secret_key))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|err| {
                VerifyError::Transport(format!("paypal token request failed: {err}"))
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Configuration(format!(
                "PayPal token exchange failed: status {status}"
            )));
        }
        let token: PaypalTokenResponse = response.json().await.map_err(|err| {
            VerifyError::MalformedResponse(format!("paypal token undecodable: {err}"))
        })?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentVerifier for PaypalVerifier {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Paypal
    }

    async fn verify(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let VerificationRequest::Paypal(paypal) = request else {
            return Err(VerifyError::Configuration(
                "paypal verifier received a non-paypal request".to_string(),
            ));
        };
        let Some(order_id) = paypal.order_id.as_deref() else {
            return Ok(VerificationResult::declined(
                ProviderKind::Paypal,
                "Missing PayPal orderId",
            ));
        };
        if !client::is_safe_path_segment(order_id) {
            return Ok(VerificationResult::declined(
                ProviderKind::Paypal,
                "Invalid PayPal orderId",
            ));
        }

        let configured = self.config.base_for_mode(gateway.mode);
        let base = client::resolve_base(gateway, configured);
        let http = client::build_client(self.config.timeout_ms, &self.config.user_agent)?;

        // Strict ordering: the token must be in hand before the lookup.
        let token = self.fetch_access_token(&http, base, gateway).await?;
        let response = http
            .get(format!("{base}/v2/checkout/orders/{order_id}"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| VerifyError::Transport(format!("paypal order request failed: {err}")))?;
        client::ensure_api_success(ProviderKind::Paypal, response.status())?;
        let order: PaypalOrder = response.json().await.map_err(|err| {
            VerifyError::MalformedResponse(format!("paypal order undecodable: {err}"))
        })?;

        if order.status != "COMPLETED" {
            return Ok(VerificationResult::declined(
                ProviderKind::Paypal,
                format!("PayPal order not completed: {}", order.status),
            ));
        }

        let unit = order.purchase_units.first();
        let metadata = unit
            .and_then(|unit| unit.custom_id.as_deref())
            .map_or_else(VerifiedMetadata::empty, VerifiedMetadata::from_json_str);
        let amount_raw = unit.and_then(|unit| unit.amount.as_ref());
        let amount = match amount_raw.and_then(|amount| amount.value.as_deref()) {
            Some(value) => Some(parse_decimal_amount(value).ok_or_else(|| {
                VerifyError::MalformedResponse(format!("paypal amount undecodable: {value}"))
            })?),
            None => None,
        };
        let currency = amount_raw.and_then(|amount| amount.currency_code.clone());

        let Some(transaction) = TransactionRef::from_reference(order.id) else {
            return Err(VerifyError::MalformedResponse("paypal order id missing".to_string()));
        };
        Ok(VerificationResult::approved(
            ProviderKind::Paypal,
            transaction,
            amount,
            currency,
            metadata,
        ))
    }
}
