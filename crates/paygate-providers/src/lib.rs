// crates/paygate-providers/src/lib.rs
// ============================================================================
// Module: PayGate Providers
// Description: Provider verifiers and the dispatch registry.
// Purpose: Reduce five provider confirmation protocols to one result shape.
// Dependencies: paygate-core, reqwest, serde, hmac, sha2, subtle
// ============================================================================

//! ## Overview
//! This crate ships the five built-in payment verifiers (Stripe, Razorpay,
//! PayPal, Paystack, PowerTranz) and a registry that dispatches verification
//! calls by provider tag. Verifiers are stateless adapters: each call builds
//! its own HTTP client from the supplied gateway credentials, performs the
//! prescribed outbound calls, and normalizes the reply into a
//! [`paygate_core::VerificationResult`].
//! Invariants:
//! - Verification calls are routed via [`VerifierRegistry`] by provider tag;
//!   unknown tags fail with a configuration error, never a default provider.
//! - Input validation failures return declined results before any network
//!   call is made.
//! - Endpoint selection honors the configured gateway mode.
//!
//! Security posture: payloads and provider responses are untrusted; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod client;
pub mod paypal;
pub mod paystack;
pub mod powertranz;
pub mod razorpay;
pub mod registry;
pub mod stripe;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use paypal::PaypalVerifier;
pub use paypal::PaypalVerifierConfig;
pub use paystack::PaystackVerifier;
pub use paystack::PaystackVerifierConfig;
pub use powertranz::PowertranzVerifier;
pub use powertranz::PowertranzVerifierConfig;
pub use razorpay::RazorpayVerifier;
pub use razorpay::RazorpayVerifierConfig;
pub use registry::BuiltinVerifierConfigs;
pub use registry::VerifierAccessPolicy;
pub use registry::VerifierRegistry;
pub use stripe::StripeVerifier;
pub use stripe::StripeVerifierConfig;
pub use telemetry::MetricsSink;
pub use telemetry::NullMetricsSink;
pub use telemetry::VerifyMetricEvent;
pub use telemetry::VerifyOutcome;
