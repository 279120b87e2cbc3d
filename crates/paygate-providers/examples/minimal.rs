// crates/paygate-providers/examples/minimal.rs
// ============================================================================
// Module: PayGate Minimal Example
// Description: Minimal dispatch through the verifier registry, offline.
// Purpose: Demonstrate tag dispatch, alias resolution, and fail-fast results.
// Dependencies: paygate-providers, paygate-core
// ============================================================================

//! ## Overview
//! Dispatches two verifications through the registry without any network:
//! an unknown provider tag (a configuration error) and a Stripe payload with
//! no intent id (a declined result produced before any outbound call).

use paygate_core::GatewayCredentials;
use paygate_core::GatewayMode;
use paygate_core::ProviderKind;
use paygate_providers::BuiltinVerifierConfigs;
use paygate_providers::VerifierRegistry;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let registry = VerifierRegistry::with_builtin_verifiers(BuiltinVerifierConfigs::default());
    let gateway = GatewayCredentials::new("pk_example", "sk_example", GatewayMode::Sandbox);

    // Unknown tags are configuration errors, never defaulted to a provider.
    let unknown = runtime.block_on(registry.verify("venmo", &json!({}), &gateway));
    if unknown.is_ok() {
        return Err("unknown provider tag must not dispatch".into());
    }

    // A payload missing its identifier declines before any network call.
    let declined = runtime.block_on(registry.verify("stripe", &json!({}), &gateway))?;
    if declined.success || declined.provider != ProviderKind::Stripe {
        return Err("empty stripe payload must decline".into());
    }
    let _ = declined.message;

    Ok(())
}
