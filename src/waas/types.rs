//! Wallet backend wire types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Curve;

/// One registered threshold key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub id: String,
    /// Raw curve name as stored by the backend.
    pub curve: String,
    pub public_key: String,
    /// Backend timestamp, kept verbatim.
    pub created_at: String,
}

impl KeyRecord {
    /// Exact, case-sensitive match against the backend's curve name.
    pub fn is_curve(&self, curve: Curve) -> bool {
        self.curve == curve.as_str()
    }

    /// Registration time, if the backend's timestamp is RFC 3339 or
    /// `YYYY-MM-DD HH:MM:SS` (read as UTC).
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// All keys owned by one user, in backend order.
pub type WalletKeySet = Vec<KeyRecord>;

/// Short-lived credential scoping one MPC session to one key id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletToken {
    pub token: String,
}

impl std::fmt::Debug for WalletToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /v3/wallet/key`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterKeyRequest {
    pub id: String,
    pub curve: String,
    pub public_key: String,
}

/// Public key half of a wallet entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletPublicKey {
    pub curve: String,
    pub public_key: String,
}

/// Chain addresses derived from a wallet key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddress {
    pub solana: Option<String>,
    pub evm: Option<String>,
    pub btc: Option<String>,
    pub aptos: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub key: WalletPublicKey,
    pub address: WalletAddress,
}

/// `GET /v3/wallet` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletResponse {
    pub user_id: String,
    pub wallets: Vec<Wallet>,
}

/// `GET /v3/wallet/user` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletUserResponse {
    pub user_id: String,
    pub key: Vec<KeyRecord>,
}
