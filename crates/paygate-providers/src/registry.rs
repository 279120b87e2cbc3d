// crates/paygate-providers/src/registry.rs
// ============================================================================
// Module: Verifier Registry
// Description: Registry and dispatcher for payment verifiers.
// Purpose: Route verification calls by provider tag with policy checks.
// Dependencies: paygate-core
// ============================================================================

//! ## Overview
//! The registry resolves verification calls by provider tag and enforces
//! allowlist and denylist policy. Dispatch is a pure lookup: an unknown tag
//! fails with a configuration error and is never defaulted to a provider.
//! The raw client payload is turned into the typed request union here, at
//! the boundary, so verifiers never see unresolved field aliases.
//! Security posture: provider tags and payloads are untrusted; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use paygate_core::GatewayCredentials;
use paygate_core::PaymentVerifier;
use paygate_core::ProviderKind;
use paygate_core::VerificationRequest;
use paygate_core::VerificationResult;
use paygate_core::VerifyError;
use serde_json::Value;

use crate::PaypalVerifier;
use crate::PaypalVerifierConfig;
use crate::PaystackVerifier;
use crate::PaystackVerifierConfig;
use crate::PowertranzVerifier;
use crate::PowertranzVerifierConfig;
use crate::RazorpayVerifier;
use crate::RazorpayVerifierConfig;
use crate::StripeVerifier;
use crate::StripeVerifierConfig;
use crate::telemetry::MetricsSink;
use crate::telemetry::NullMetricsSink;
use crate::telemetry::VerifyMetricEvent;
use crate::telemetry::VerifyOutcome;

// ============================================================================
// SECTION: Built-in Config
// ============================================================================

/// Configuration bundle for the built-in verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuiltinVerifierConfigs {
    /// Configuration for the Stripe verifier.
    pub stripe: StripeVerifierConfig,
    /// Configuration for the Razorpay verifier.
    pub razorpay: RazorpayVerifierConfig,
    /// Configuration for the PayPal verifier.
    pub paypal: PaypalVerifierConfig,
    /// Configuration for the Paystack verifier.
    pub paystack: PaystackVerifierConfig,
    /// Configuration for the PowerTranz verifier.
    pub powertranz: PowertranzVerifierConfig,
}

// ============================================================================
// SECTION: Access Policy
// ============================================================================

/// Access policy controlling which providers may be dispatched to.
///
/// # Invariants
/// - `denylist` overrides `allowlist` when both are present.
/// - If `allowlist` is `None`, all providers are allowed unless denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierAccessPolicy {
    /// Optional allowlist of provider tags.
    pub allowlist: Option<BTreeSet<ProviderKind>>,
    /// Explicit denylist of provider tags.
    pub denylist: BTreeSet<ProviderKind>,
}

impl VerifierAccessPolicy {
    /// Returns a policy that permits all providers.
    #[must_use]
    pub const fn allow_all() -> Self {
        Self {
            allowlist: None,
            denylist: BTreeSet::new(),
        }
    }

    /// Returns true when the provider is allowed by policy.
    #[must_use]
    pub fn is_allowed(&self, provider: ProviderKind) -> bool {
        if self.denylist.contains(&provider) {
            return false;
        }
        if let Some(allowlist) = &self.allowlist {
            return allowlist.contains(&provider);
        }
        true
    }
}

impl Default for VerifierAccessPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

// ============================================================================
// SECTION: Verifier Registry
// ============================================================================

/// Payment verifier registry with policy enforcement.
///
/// # Invariants
/// - One verifier per provider tag.
/// - Access policy is enforced on every dispatch.
/// - Registered verifiers are `Send + Sync` and stored behind trait objects;
///   the registry itself holds no per-call state.
pub struct VerifierRegistry {
    /// Verifier implementations keyed by provider tag.
    verifiers: BTreeMap<ProviderKind, Box<dyn PaymentVerifier>>,
    /// Access control policy for dispatch.
    policy: VerifierAccessPolicy,
    /// Metric sink for dispatch events.
    metrics: Arc<dyn MetricsSink>,
}

impl VerifierRegistry {
    /// Creates an empty registry with the provided policy.
    #[must_use]
    pub fn new(policy: VerifierAccessPolicy) -> Self {
        Self {
            verifiers: BTreeMap::new(),
            policy,
            metrics: Arc::new(NullMetricsSink),
        }
    }

    /// Creates a registry with all five built-in verifiers registered.
    #[must_use]
    pub fn with_builtin_verifiers(configs: BuiltinVerifierConfigs) -> Self {
        let mut registry = Self::new(VerifierAccessPolicy::default());
        registry.verifiers.insert(
            ProviderKind::Stripe,
            Box::new(StripeVerifier::new(configs.stripe)),
        );
        registry.verifiers.insert(
            ProviderKind::Razorpay,
            Box::new(RazorpayVerifier::new(configs.razorpay)),
        );
        registry
            .verifiers
            .insert(ProviderKind::Paypal, Box::new(PaypalVerifier::new(configs.paypal)));
        registry.verifiers.insert(
            ProviderKind::Paystack,
            Box::new(PaystackVerifier::new(configs.paystack)),
        );
        registry.verifiers.insert(
            ProviderKind::Powertranz,
            Box::new(PowertranzVerifier::new(configs.powertranz)),
        );
        registry
    }

    /// Replaces the access policy.
    #[must_use]
    pub fn with_policy(mut self, policy: VerifierAccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Plugs in a metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Registers a verifier under its own provider tag.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Configuration`] when the tag is already taken.
    pub fn register_verifier(
        &mut self,
        verifier: Box<dyn PaymentVerifier>,
    ) -> Result<(), VerifyError> {
        let provider = verifier.provider();
        if self.verifiers.contains_key(&provider) {
            return Err(VerifyError::Configuration(format!(
                "verifier already registered: {provider}"
            )));
        }
        self.verifiers.insert(provider, verifier);
        Ok(())
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> &VerifierAccessPolicy {
        &self.policy
    }

    /// Verifies a raw client payload against the named provider.
    ///
    /// The payload is turned into the typed request union here; verifiers
    /// never see unresolved aliases.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Configuration`] for unknown tags, policy
    /// blocks, and missing verifiers; propagates verifier errors otherwise.
    pub async fn verify(
        &self,
        provider_tag: &str,
        payload: &Value,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let started = Instant::now();
        let Ok(provider) = provider_tag.parse::<ProviderKind>() else {
            let result = Err(VerifyError::Configuration(format!(
                "unknown payment provider: {provider_tag}"
            )));
            self.emit(None, gateway, &result, started);
            return result;
        };
        let request = VerificationRequest::from_client_payload(provider, payload);
        let result = self.dispatch(&request, gateway).await;
        self.emit(Some(provider), gateway, &result, started);
        result
    }

    /// Verifies an already-typed request.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Configuration`] for policy blocks and missing
    /// verifiers; propagates verifier errors otherwise.
    pub async fn verify_request(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let started = Instant::now();
        let result = self.dispatch(request, gateway).await;
        self.emit(Some(request.provider()), gateway, &result, started);
        result
    }

    /// Policy check plus table lookup plus verifier call.
    async fn dispatch(
        &self,
        request: &VerificationRequest,
        gateway: &GatewayCredentials,
    ) -> Result<VerificationResult, VerifyError> {
        let provider = request.provider();
        if !self.policy.is_allowed(provider) {
            return Err(VerifyError::Configuration(format!(
                "provider blocked by policy: {provider}"
            )));
        }
        let Some(verifier) = self.verifiers.get(&provider) else {
            return Err(VerifyError::Configuration(format!(
                "no verifier registered for provider: {provider}"
            )));
        };
        verifier.verify(request, gateway).await
    }

    /// Emits one metric event for a finished dispatch.
    fn emit(
        &self,
        provider: Option<ProviderKind>,
        gateway: &GatewayCredentials,
        result: &Result<VerificationResult, VerifyError>,
        started: Instant,
    ) {
        self.metrics.record_verification(&VerifyMetricEvent {
            provider,
            mode: gateway.mode,
            outcome: VerifyOutcome::classify(result),
            latency: started.elapsed(),
        });
    }
}
