//! Share material and MPC call parameters.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::Curve;

/// The client-held threshold-share artifact for a key.
///
/// `encrypted_share` and `secret_store` are opaque: only the MPC node client
/// produces or reads them. Persisting them is the caller's job.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ShareMaterial {
    pub key_id: String,
    pub encrypted_share: String,
    pub secret_store: String,
    #[zeroize(skip)]
    pub curve: Curve,
}

impl std::fmt::Debug for ShareMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareMaterial")
            .field("key_id", &self.key_id)
            .field("encrypted_share", &"<redacted>")
            .field("secret_store", &"<redacted>")
            .field("curve", &self.curve)
            .finish()
    }
}

/// Both MPC node endpoints. Node 1 also serves signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEndpoints {
    pub node1_url: String,
    pub node2_url: String,
}

impl NodeEndpoints {
    pub fn new(node1_url: impl Into<String>, node2_url: impl Into<String>) -> Self {
        Self {
            node1_url: node1_url.into(),
            node2_url: node2_url.into(),
        }
    }
}

/// Two-node distributed key generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerateShareParams<'a> {
    pub node1_url: &'a str,
    pub node2_url: &'a str,
    pub key_id: &'a str,
    pub token: &'a str,
    pub curve: Curve,
    pub password: &'a str,
}

/// Two-node share recovery from the node-side state of `source_key_id`.
#[derive(Debug, Clone, Copy)]
pub struct RecoverShareParams<'a> {
    pub node1_url: &'a str,
    pub node2_url: &'a str,
    pub token: &'a str,
    pub target_key_id: &'a str,
    pub source_key_id: &'a str,
    pub curve: Curve,
    pub password: &'a str,
}

/// Single-node signing with the client-held share.
#[derive(Debug, Clone, Copy)]
pub struct SignParams<'a> {
    pub node1_url: &'a str,
    pub token: &'a str,
    pub key_id: &'a str,
    pub encrypted_share: &'a str,
    pub secret_store: &'a str,
    pub curve: Curve,
    pub message: &'a str,
}

/// Outcome of an offline password or share check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            valid: true,
            detail: None,
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self {
            valid: false,
            detail: Some(detail.into()),
        }
    }
}
