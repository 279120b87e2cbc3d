// crates/paygate-receipts/src/client.rs
// ============================================================================
// Module: Receipt HTTP Client
// Description: Hardened HTTP client construction for receipt endpoints.
// Purpose: Keep both receipt services on the same client settings.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Receipt services build their HTTP client here, per call. Redirects are
//! disabled and a timeout is always set. Identifiers embedded in Android
//! Publisher paths are screened against path splicing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;

use crate::error::ReceiptError;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default request timeout applied by receipt service configs.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default user agent sent on receipt endpoint calls.
pub(crate) const DEFAULT_USER_AGENT: &str = "paygate/0.1";

// ============================================================================
// SECTION: Client Construction
// ============================================================================

/// Builds a hardened HTTP client for one verification call.
///
/// # Errors
///
/// Returns [`ReceiptError::Transport`] when the client cannot be created.
pub(crate) fn build_client(timeout_ms: u64, user_agent: &str) -> Result<Client, ReceiptError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(user_agent.to_string())
        .redirect(Policy::none())
        .build()
        .map_err(|_| ReceiptError::Transport("http client build failed".to_string()))
}

// ============================================================================
// SECTION: Request Helpers
// ============================================================================

/// Returns true when a client-supplied identifier is safe to embed in a
/// publisher API URL path.
pub(crate) fn is_safe_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}
