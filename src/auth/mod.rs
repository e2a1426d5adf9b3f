//! Auth backend client.
//!
//! Issues the access token the key-share saga consumes. The saga treats that
//! token as opaque and never validates or refreshes it.

pub mod types;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::config::Settings;
use crate::envelope::EmptyResponse;
use crate::error::{ApiError, ApiResult};
use crate::http::{build_client, join_url, send_data, send_envelope};

pub use types::{LoginRequest, LoginResponse, SendLoginCodeRequest, VerifyLoginCodeRequest};

/// Typed client for email login-code and password login.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http_client: Client,
    base_url: String,
    platform: String,
    access_key: String,
    access_secret: String,
    service_id: String,
}

impl AuthClient {
    pub fn new(
        base_url: &str,
        platform: &str,
        access_key: &str,
        access_secret: &str,
        service_id: &str,
        timeout: Duration,
    ) -> ApiResult<Self> {
        Ok(Self {
            http_client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            platform: platform.to_string(),
            access_key: access_key.to_string(),
            access_secret: access_secret.to_string(),
            service_id: service_id.to_string(),
        })
    }

    /// Build from settings. Fails when the auth backend is not fully configured.
    pub fn from_settings(settings: &Settings) -> ApiResult<Self> {
        match (
            settings.auth_base_url(),
            settings.auth_access_key(),
            settings.auth_access_secret(),
            settings.auth_service_id(),
        ) {
            (Some(base_url), Some(access_key), Some(access_secret), Some(service_id)) => {
                Self::new(
                    base_url,
                    settings.auth_platform(),
                    access_key,
                    access_secret,
                    service_id,
                    settings.request_timeout(),
                )
            }
            _ => Err(ApiError::ClientInitialization(
                "Auth backend is not configured".to_string(),
            )),
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http_client
            .post(join_url(&self.base_url, path))
            .header("X-Platform", &self.platform)
            .header("X-Access-Key", &self.access_key)
            .header("X-Access-Secret", &self.access_secret)
            .header("X-Service-Id", &self.service_id)
    }

    /// POST /v1/auth/login-code
    #[tracing::instrument(skip(self, email))]
    pub async fn send_login_code(&self, email: &str, lang: &str) -> ApiResult<()> {
        let body = SendLoginCodeRequest {
            email: email.to_string(),
            lang: lang.to_string(),
        };
        send_envelope::<EmptyResponse>(self.post("/v1/auth/login-code").json(&body), "send_login_code")
            .await?
            .into_ack()
    }

    /// POST /v1/auth/login-code/verify
    #[tracing::instrument(skip_all)]
    pub async fn verify_login_code(&self, email: &str, code: &str) -> ApiResult<()> {
        let body = VerifyLoginCodeRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        send_envelope::<EmptyResponse>(
            self.post("/v1/auth/login-code/verify").json(&body),
            "verify_login_code",
        )
        .await?
        .into_ack()
    }

    /// POST /v1/auth/token
    #[tracing::instrument(skip(self, email, password))]
    pub async fn login(
        &self,
        grant_type: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            grant_type: grant_type.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        send_data(self.post("/v1/auth/token").json(&body), "login").await
    }
}
