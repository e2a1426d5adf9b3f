//! Wallet registry access.
//!
//! - `types`: Envelope payloads and key records
//! - `client`: reqwest implementation of [`WalletBackend`]

pub mod client;
pub mod types;

pub use client::WaasClient;
pub use types::*;

use crate::error::ApiResult;

/// The wallet registry operations the key-share saga depends on.
#[allow(async_fn_in_trait)]
pub trait WalletBackend {
    /// Fetch every key registered for the user, in backend order.
    async fn get_wallet_keys(&self, access_token: &str) -> ApiResult<WalletKeySet>;

    /// Fetch a one-time token scoping an MPC session to `key_id`.
    async fn get_wallet_token(&self, access_token: &str, key_id: &str) -> ApiResult<WalletToken>;

    /// Register a freshly generated public key under `key_id`.
    async fn register_wallet_key(
        &self,
        access_token: &str,
        key_id: &str,
        curve: &str,
        public_key: &str,
    ) -> ApiResult<KeyRecord>;
}
