// crates/paygate-providers/src/telemetry.rs
// ============================================================================
// Module: Verification Telemetry
// Description: Observability hooks for verification dispatch.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: paygate-core
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for verification counters and
//! latency histograms. It is intentionally dependency-light so downstream
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Security posture: telemetry must never carry payment identifiers, amounts,
//! or gateway secrets; labels are the closed enums below.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use paygate_core::GatewayMode;
use paygate_core::ProviderKind;
use paygate_core::VerificationResult;
use paygate_core::VerifyError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for verification histograms.
pub const VERIFY_LATENCY_BUCKETS_MS: &[u64] =
    &[5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Verification outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum VerifyOutcome {
    /// Provider confirmed a completed/accepted payment.
    Approved,
    /// Provider or input validation declined the payment.
    Declined,
    /// Transport fault or undecodable provider reply.
    TransportError,
    /// Unknown provider tag, policy block, or unusable credentials.
    ConfigError,
}

impl VerifyOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::TransportError => "transport_error",
            Self::ConfigError => "config_error",
        }
    }

    /// Classifies a dispatch result into an outcome label.
    #[must_use]
    pub fn classify(result: &Result<VerificationResult, VerifyError>) -> Self {
        match result {
            Ok(verification) => {
                if verification.success {
                    Self::Approved
                } else {
                    Self::Declined
                }
            }
            Err(VerifyError::Configuration(_)) => Self::ConfigError,
            Err(VerifyError::Transport(_) | VerifyError::MalformedResponse(_)) => {
                Self::TransportError
            }
        }
    }
}

// ============================================================================
// SECTION: Metric Events
// ============================================================================

/// Verification metric event payload.
///
/// # Invariants
/// - `provider` is `None` only when the tag failed to parse.
/// - No field carries identifiers, amounts, or secrets.
#[derive(Debug, Clone)]
pub struct VerifyMetricEvent {
    /// Provider label, when the tag parsed.
    pub provider: Option<ProviderKind>,
    /// Gateway mode label.
    pub mode: GatewayMode,
    /// Outcome classification.
    pub outcome: VerifyOutcome,
    /// End-to-end dispatch latency.
    pub latency: Duration,
}

// ============================================================================
// SECTION: Metrics Sink
// ============================================================================

/// Receiver for verification metric events.
pub trait MetricsSink: Send + Sync {
    /// Records one verification dispatch.
    fn record_verification(&self, event: &VerifyMetricEvent);
}

/// Sink that drops every event; the default when no backend is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetricsSink;

impl MetricsSink for NullMetricsSink {
    fn record_verification(&self, _event: &VerifyMetricEvent) {}
}
