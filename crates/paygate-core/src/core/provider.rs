// crates/paygate-core/src/core/provider.rs
// ============================================================================
// Module: Payment Provider Tags
// Description: Canonical identifiers and credentials for payment gateways.
// Purpose: Centralize the closed provider set and per-gateway credentials.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! PayGate supports a closed set of payment providers. The tag set is a
//! proper enum rather than a free-form string so an unknown tag is rejected
//! at the dispatch boundary instead of being silently defaulted.
//! Invariants:
//! - Wire forms are lowercase ASCII and stable for config and dispatch.
//! - Credentials are loaded fresh per verification call and never mutated.
//!
//! Security posture: provider tags arrive from untrusted clients; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Provider Tags
// ============================================================================

/// Closed set of supported payment providers.
///
/// # Invariants
/// - Variants and their lowercase wire forms are stable for dispatch,
///   config records, and telemetry labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Stripe PaymentIntents.
    Stripe,
    /// Razorpay orders with callback signatures.
    Razorpay,
    /// PayPal checkout orders.
    Paypal,
    /// Paystack transactions.
    Paystack,
    /// PowerTranz SPI payments.
    Powertranz,
}

/// All supported provider tags in stable order.
pub const ALL_PROVIDERS: [ProviderKind; 5] = [
    ProviderKind::Stripe,
    ProviderKind::Razorpay,
    ProviderKind::Paypal,
    ProviderKind::Paystack,
    ProviderKind::Powertranz,
];

impl ProviderKind {
    /// Returns the stable lowercase tag for the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Razorpay => "razorpay",
            Self::Paypal => "paypal",
            Self::Paystack => "paystack",
            Self::Powertranz => "powertranz",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a provider tag is not in the supported set.
///
/// # Invariants
/// - The offending tag is carried verbatim for caller diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment provider: {tag}")]
pub struct UnknownProviderError {
    /// The unrecognized tag as submitted.
    pub tag: String,
}

impl FromStr for ProviderKind {
    type Err = UnknownProviderError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        ALL_PROVIDERS.iter().copied().find(|kind| kind.as_str() == tag).ok_or_else(|| {
            UnknownProviderError {
                tag: tag.to_string(),
            }
        })
    }
}

// ============================================================================
// SECTION: Gateway Mode
// ============================================================================

/// Live versus sandbox selection for a configured gateway.
///
/// # Invariants
/// - Endpoint selection must honor this value; verifiers never hardcode a
///   sandbox base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Production endpoints with live credentials.
    Live,
    /// Sandbox endpoints with test credentials. Admin records written by the
    /// legacy dashboard use `test` for the same thing.
    #[default]
    #[serde(alias = "test")]
    Sandbox,
}

impl GatewayMode {
    /// Returns the stable lowercase label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Gateway Credentials
// ============================================================================

/// Credentials for one admin-configured gateway record.
///
/// # Invariants
/// - Values are snapshots taken per verification call; verifiers must not
///   cache them across calls (credentials are admin-editable).
/// - `endpoint` overrides the mode-selected base URL when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayCredentials {
    /// Public / publishable key (key id for Razorpay, client id for PayPal,
    /// PowerTranz id for PowerTranz).
    pub public_key: String,
    /// Secret key used for server-to-server confirmation calls.
    pub secret_key: String,
    /// Live versus sandbox endpoint selection.
    pub mode: GatewayMode,
    /// Optional base URL override for tests and regional deployments.
    pub endpoint: Option<String>,
}

impl GatewayCredentials {
    /// Creates credentials with no endpoint override.
    #[must_use]
    pub fn new(
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
        mode: GatewayMode,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            mode,
            endpoint: None,
        }
    }

    /// Returns the same credentials with a base URL override applied.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}
