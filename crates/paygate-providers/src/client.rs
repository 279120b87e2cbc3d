// crates/paygate-providers/src/client.rs
// ============================================================================
// Module: Verifier HTTP Client
// Description: Shared HTTP client construction and response policy helpers.
// Purpose: Keep every verifier on the same hardened client settings.
// Dependencies: paygate-core, reqwest
// ============================================================================

//! ## Overview
//! Every verifier builds its HTTP client here, per call, from the settings in
//! its own config. Redirects are disabled and a timeout is always set.
//! Identifiers that end up in request paths are screened so a hostile payload
//! cannot splice extra path segments into a provider URL.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use paygate_core::GatewayCredentials;
use paygate_core::ProviderKind;
use paygate_core::VerifyError;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::redirect::Policy;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default request timeout applied by every verifier config.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default user agent sent on provider calls.
pub(crate) const DEFAULT_USER_AGENT: &str = "paygate/0.1";

// ============================================================================
// SECTION: Client Construction
// ============================================================================

/// Builds a hardened HTTP client for one verification call.
///
/// # Errors
///
/// Returns [`VerifyError::Transport`] when the client cannot be created.
pub(crate) fn build_client(timeout_ms: u64, user_agent: &str) -> Result<Client, VerifyError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(user_agent.to_string())
        .redirect(Policy::none())
        .build()
        .map_err(|_| VerifyError::Transport("http client build failed".to_string()))
}

// ============================================================================
// SECTION: Request Helpers
// ============================================================================

/// Returns the effective base URL: gateway override first, config second.
pub(crate) fn resolve_base<'a>(gateway: &'a GatewayCredentials, configured: &'a str) -> &'a str {
    gateway.endpoint.as_deref().unwrap_or(configured).trim_end_matches('/')
}

/// Returns true when a client-supplied identifier is safe to embed in a
/// provider URL path (no separators, no percent tricks).
pub(crate) fn is_safe_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

/// Maps a non-success provider HTTP status onto the error taxonomy.
///
/// Credential rejections become configuration errors so callers do not retry
/// them; everything else is a transport fault the caller may retry.
///
/// # Errors
///
/// Returns [`VerifyError`] for every non-2xx status.
pub(crate) fn ensure_api_success(
    provider: ProviderKind,
    status: StatusCode,
) -> Result<(), VerifyError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(VerifyError::Configuration(format!(
            "{provider} rejected the configured credentials (status {status})"
        )));
    }
    Err(VerifyError::Transport(format!("{provider} api returned status {status}")))
}
