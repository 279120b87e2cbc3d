// crates/paygate-config/src/lib.rs
// ============================================================================
// Module: PayGate Config
// Description: Admin-configured gateway records and receipt service settings.
// Purpose: Load and validate the canonical TOML configuration fail-closed.
// Dependencies: paygate-core, serde, toml, thiserror
// ============================================================================

//! ## Overview
//! PayGate is configured by one TOML file: a list of `[[gateway]]` records
//! binding a provider tag to credentials and a mode, plus optional
//! `[receipts.apple]` and `[receipts.google]` sections. Loading is strict
//! and fail-closed: path limits, a hard size cap, UTF-8 only, strict TOML,
//! and per-provider credential validation. Credentials are handed to the
//! dispatcher as fresh snapshots per verification call.
//! Invariants:
//! - At most one gateway record per provider.
//! - Validation errors carry stable message needles for tests and operators.
//!
//! Security posture: the config file carries secrets; loaders must never
//! echo secret values in error messages. See `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;

use paygate_core::GatewayCredentials;
use paygate_core::GatewayMode;
use paygate_core::ProviderKind;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum config file size accepted by the loader.
pub const MAX_CONFIG_BYTES: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default config file name used when no path is supplied.
const DEFAULT_CONFIG_PATH: &str = "paygate.toml";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never contain secret values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem error while reading the config.
    #[error("config io error: {0}")]
    Io(String),
    /// The file is not valid TOML for the canonical model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The file violates a load guard or a validation rule.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Gateway Settings
// ============================================================================

/// One admin-configured gateway record.
///
/// # Invariants
/// - `provider` is unique across the config.
/// - Credential requirements are provider-specific (see `validate`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySettings {
    /// Provider this record configures.
    pub provider: ProviderKind,
    /// Public / publishable key.
    #[serde(default)]
    pub public_key: String,
    /// Secret key for server-to-server calls.
    #[serde(default)]
    pub secret_key: String,
    /// Live versus sandbox selection (`test` is accepted for sandbox).
    #[serde(default)]
    pub mode: GatewayMode,
    /// Optional base URL override for tests and regional deployments.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Whether the gateway is dispatchable; disabled records keep their
    /// credentials but refuse lookups.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Serde default for [`GatewaySettings::enabled`].
const fn default_enabled() -> bool {
    true
}

impl GatewaySettings {
    /// Produces a fresh credential snapshot for one verification call.
    #[must_use]
    pub fn credentials(&self) -> GatewayCredentials {
        GatewayCredentials {
            public_key: self.public_key.clone(),
            secret_key: self.secret_key.clone(),
            mode: self.mode,
            endpoint: self.endpoint.clone(),
        }
    }

    /// Validates provider-specific credential requirements.
    fn validate(&self) -> Result<(), ConfigError> {
        let provider = self.provider;
        let needs_public = matches!(
            provider,
            ProviderKind::Razorpay | ProviderKind::Paypal | ProviderKind::Powertranz
        );
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "gateway secret_key must not be empty ({provider})"
            )));
        }
        if needs_public && self.public_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "gateway public_key must not be empty ({provider})"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Receipt Settings
// ============================================================================

/// Apple receipt service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppleSettings {
    /// App-specific shared secret for verifyReceipt.
    pub shared_secret: String,
    /// Optional production endpoint override.
    #[serde(default)]
    pub production_url: Option<String>,
    /// Optional sandbox endpoint override.
    #[serde(default)]
    pub sandbox_url: Option<String>,
}

/// Google Play receipt service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleSettings {
    /// Bearer token for the Android Publisher API.
    pub access_token: String,
    /// Optional publisher API base override.
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Receipt service sections; each store is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiptSettings {
    /// Apple App Store section.
    #[serde(default)]
    pub apple: Option<AppleSettings>,
    /// Google Play section.
    #[serde(default)]
    pub google: Option<GoogleSettings>,
}

// ============================================================================
// SECTION: Config Root
// ============================================================================

/// Canonical PayGate configuration.
///
/// # Invariants
/// - A loaded value has always passed `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayGateConfig {
    /// Gateway records, at most one per provider.
    #[serde(default, rename = "gateway")]
    pub gateways: Vec<GatewaySettings>,
    /// Receipt service sections.
    #[serde(default)]
    pub receipts: ReceiptSettings,
}

impl PayGateConfig {
    /// Loads and validates the config from `path` (or `paygate.toml`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a load guard, the parse, or validation
    /// fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        validate_path(path)?;
        let bytes =
            std::fs::read(path).map_err(|err| ConfigError::Io(format!("read failed: {err}")))?;
        if bytes.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let raw = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the parse or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the whole config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the failing rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for gateway in &self.gateways {
            if !seen.insert(gateway.provider) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate gateway for provider: {}",
                    gateway.provider
                )));
            }
            gateway.validate()?;
        }
        if let Some(apple) = &self.receipts.apple {
            if apple.shared_secret.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "apple shared_secret must not be empty".to_string(),
                ));
            }
        }
        if let Some(google) = &self.receipts.google {
            if google.access_token.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "google access_token must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Returns the enabled gateway record for a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the gateway is absent or
    /// disabled; the dispatcher reports this to the caller as a
    /// configuration failure, never a silent default.
    pub fn gateway(&self, provider: ProviderKind) -> Result<&GatewaySettings, ConfigError> {
        let Some(gateway) = self.gateways.iter().find(|gateway| gateway.provider == provider)
        else {
            return Err(ConfigError::Invalid(format!("no gateway configured for: {provider}")));
        };
        if !gateway.enabled {
            return Err(ConfigError::Invalid(format!("gateway disabled for: {provider}")));
        }
        Ok(gateway)
    }
}

// ============================================================================
// SECTION: Path Guards
// ============================================================================

/// Enforces path length limits before touching the filesystem.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
