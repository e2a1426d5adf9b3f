//! Wallet backend HTTP client.

use std::time::Duration;

use reqwest::Client;

use crate::error::ApiResult;
use crate::http::{build_client, join_url, send_data};
use crate::waas::WalletBackend;
use crate::waas::types::{
    KeyRecord, RegisterKeyRequest, WalletKeySet, WalletResponse, WalletToken, WalletUserResponse,
};

/// Typed client for the wallet registry (`/v3/wallet*`).
#[derive(Debug, Clone)]
pub struct WaasClient {
    http_client: Client,
    base_url: String,
}

impl WaasClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str, access_token: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(join_url(&self.base_url, path))
            .bearer_auth(access_token)
    }

    /// GET /v3/wallet
    #[tracing::instrument(skip_all)]
    pub async fn get_wallet(&self, access_token: &str) -> ApiResult<WalletResponse> {
        send_data(self.get("/v3/wallet", access_token), "get_wallet").await
    }

    /// GET /v3/wallet/user
    #[tracing::instrument(skip_all)]
    pub async fn get_wallet_user(&self, access_token: &str) -> ApiResult<WalletUserResponse> {
        send_data(self.get("/v3/wallet/user", access_token), "get_wallet_user").await
    }
}

impl WalletBackend for WaasClient {
    /// GET /v3/wallet/key
    #[tracing::instrument(skip_all)]
    async fn get_wallet_keys(&self, access_token: &str) -> ApiResult<WalletKeySet> {
        send_data(self.get("/v3/wallet/key", access_token), "get_wallet_keys").await
    }

    /// GET /v3/wallet/token?id={key_id}
    #[tracing::instrument(skip(self, access_token))]
    async fn get_wallet_token(&self, access_token: &str, key_id: &str) -> ApiResult<WalletToken> {
        let request = self
            .get("/v3/wallet/token", access_token)
            .query(&[("id", key_id)]);
        send_data(request, "get_wallet_token").await
    }

    /// POST /v3/wallet/key
    #[tracing::instrument(skip(self, access_token, public_key))]
    async fn register_wallet_key(
        &self,
        access_token: &str,
        key_id: &str,
        curve: &str,
        public_key: &str,
    ) -> ApiResult<KeyRecord> {
        let body = RegisterKeyRequest {
            id: key_id.to_string(),
            curve: curve.to_string(),
            public_key: public_key.to_string(),
        };
        let request = self
            .http_client
            .post(join_url(&self.base_url, "/v3/wallet/key"))
            .bearer_auth(access_token)
            .json(&body);
        send_data(request, "register_wallet_key").await
    }
}
