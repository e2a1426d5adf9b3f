//! Client configuration derived from environment variables.
//!
//! Configuration is loaded once by the embedding application and validated
//! before any saga is assembled.
//!
//! ## Environment Variables
//!
//! ### Wallet saga
//! - `WAAS_BASE_URL`: Wallet backend base URL
//! - `WAAS_NODE1_URL`: First MPC node (also the signing node)
//! - `WAAS_NODE2_URL`: Second MPC node
//! - `WAAS_REQUEST_TIMEOUT_MS`: Per-request transport timeout (default: 30000)
//!
//! ### Auth backend
//! - `AUTH_BASE_URL`: Auth backend base URL
//! - `AUTH_ACCESS_KEY` / `AUTH_ACCESS_SECRET`: Service credentials
//! - `AUTH_SERVICE_ID`: Service identifier issued by the auth backend
//! - `AUTH_PLATFORM`: Platform tag (default: "server")
//!
//! - `RUST_LOG`: Log level filter

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_AUTH_PLATFORM: &str = "server";

/// Helper to get trimmed env var or empty string.
fn env_trim(name: &str) -> String {
    env::var(name).unwrap_or_default().trim().to_string()
}

/// Trimmed env var, `None` when unset or blank.
fn env_opt(name: &str) -> Option<String> {
    let value = env_trim(name);
    if value.is_empty() { None } else { Some(value) }
}

/// Elliptic curve a threshold key is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// secp256k1 curve (Bitcoin, EVM chains).
    #[default]
    Secp256k1,
    /// ed25519 curve (Solana, Aptos).
    Ed25519,
}

impl Curve {
    /// Wire name as stored by the wallet backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "secp256k1" => Ok(Self::Secp256k1),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(format!(
                "Invalid curve '{other}'. Must be 'secp256k1' or 'ed25519'."
            )),
        }
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    // Wallet saga
    waas_base_url: Option<String>,
    node1_url: Option<String>,
    node2_url: Option<String>,
    request_timeout_ms: u64,

    // Auth backend
    auth_base_url: Option<String>,
    auth_access_key: Option<String>,
    auth_access_secret: Option<String>,
    auth_service_id: Option<String>,
    auth_platform: String,
}

impl Settings {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let request_timeout_ms = env_trim("WAAS_REQUEST_TIMEOUT_MS")
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        Self {
            waas_base_url: env_opt("WAAS_BASE_URL"),
            node1_url: env_opt("WAAS_NODE1_URL"),
            node2_url: env_opt("WAAS_NODE2_URL"),
            request_timeout_ms,
            auth_base_url: env_opt("AUTH_BASE_URL"),
            auth_access_key: env_opt("AUTH_ACCESS_KEY"),
            auth_access_secret: env_opt("AUTH_ACCESS_SECRET"),
            auth_service_id: env_opt("AUTH_SERVICE_ID"),
            auth_platform: env_opt("AUTH_PLATFORM")
                .unwrap_or_else(|| DEFAULT_AUTH_PLATFORM.to_string()),
        }
    }

    /// Create settings for tests, pointing every backend at `backend_url`.
    pub fn for_tests(backend_url: &str) -> Self {
        Self {
            waas_base_url: Some(backend_url.to_string()),
            node1_url: Some("http://localhost:9001".to_string()),
            node2_url: Some("http://localhost:9002".to_string()),
            request_timeout_ms: 5_000,
            auth_base_url: Some(backend_url.to_string()),
            auth_access_key: Some("test-access-key".to_string()),
            auth_access_secret: Some("test-access-secret".to_string()),
            auth_service_id: Some("test-service".to_string()),
            auth_platform: DEFAULT_AUTH_PLATFORM.to_string(),
        }
    }

    /// Drop the wallet backend URL, leaving the saga without a collaborator.
    #[must_use]
    pub fn without_waas_base_url(mut self) -> Self {
        self.waas_base_url = None;
        self
    }

    /// Drop both node endpoints.
    #[must_use]
    pub fn without_node_urls(mut self) -> Self {
        self.node1_url = None;
        self.node2_url = None;
        self
    }

    /// Drop every auth backend setting.
    #[must_use]
    pub fn without_auth(mut self) -> Self {
        self.auth_base_url = None;
        self.auth_access_key = None;
        self.auth_access_secret = None;
        self.auth_service_id = None;
        self
    }

    /// Validate settings.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.waas_base_url.is_none() {
            return Err("WAAS_BASE_URL is required. \
                 Provide the wallet backend base URL."
                .to_string());
        }

        if self.node1_url.is_none() || self.node2_url.is_none() {
            return Err("WAAS_NODE1_URL and WAAS_NODE2_URL are required. \
                 Provide both MPC node endpoints."
                .to_string());
        }

        // Auth is optional, but if any auth setting is present all must be
        let auth = [
            &self.auth_base_url,
            &self.auth_access_key,
            &self.auth_access_secret,
            &self.auth_service_id,
        ];
        let auth_count = auth.iter().filter(|v| v.is_some()).count();
        if auth_count > 0 && auth_count < auth.len() {
            return Err("Incomplete auth configuration. Set all of: \
                 AUTH_BASE_URL, AUTH_ACCESS_KEY, AUTH_ACCESS_SECRET, AUTH_SERVICE_ID"
                .to_string());
        }

        Ok(())
    }

    // Getters

    pub fn waas_base_url(&self) -> Option<&str> {
        self.waas_base_url.as_deref()
    }

    pub fn node1_url(&self) -> Option<&str> {
        self.node1_url.as_deref()
    }

    pub fn node2_url(&self) -> Option<&str> {
        self.node2_url.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn auth_base_url(&self) -> Option<&str> {
        self.auth_base_url.as_deref()
    }

    pub fn auth_access_key(&self) -> Option<&str> {
        self.auth_access_key.as_deref()
    }

    pub fn auth_access_secret(&self) -> Option<&str> {
        self.auth_access_secret.as_deref()
    }

    pub fn auth_service_id(&self) -> Option<&str> {
        self.auth_service_id.as_deref()
    }

    pub fn auth_platform(&self) -> &str {
        &self.auth_platform
    }

    /// Check if the auth backend is configured.
    pub fn auth_enabled(&self) -> bool {
        self.auth_base_url.is_some()
            && self.auth_access_key.is_some()
            && self.auth_access_secret.is_some()
            && self.auth_service_id.is_some()
    }
}
