//! Key-share lifecycle orchestration.
//!
//! [`KeyShareSaga`] sequences wallet backend and MPC node calls for three
//! workflows:
//!
//! - **Generate**: duplicate gate, new key id, session token, two-node
//!   generation, public key, registration
//! - **Recover**: required-key gate, new key id, session token, two-node
//!   recovery from the existing key, public key, registration
//! - **Sign**: session token, single-node signing with the client-held share
//!
//! Every step is a hard gate. The first failure is translated into a
//! [`KeyShareError`] and returned; later steps never run and nothing is
//! retried. Dropping a saga future drops the in-flight call with it.
//!
//! Registration has no compensation: if it fails after the nodes produced a
//! share, the node-side artifact is orphaned. [`KeyShareSaga::register_key`]
//! lets a caller that kept the share retry registration on its own.

pub mod gates;

use serde::{Deserialize, Serialize};

use crate::config::{Curve, Settings};
use crate::error::{KeyShareError, KeyShareResult, MpcError};
use crate::mpc::{
    GenerateShareParams, MpcNodeClient, NodeEndpoints, RecoverShareParams, ShareMaterial,
    SignParams, ValidationReport,
};
use crate::waas::{KeyRecord, WaasClient, WalletBackend};

/// Output of a successful generate or recover run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyShare {
    pub share: ShareMaterial,
    pub public_key: String,
    /// Record the backend stored for the new key.
    pub record: KeyRecord,
}

/// One saga run, for callers that dispatch on a single entry point.
#[derive(Clone)]
pub enum SagaRequest {
    GenerateShare { curve: Curve, password: String },
    RecoverShare { curve: Curve, password: String },
    Sign { share: ShareMaterial, message: String },
}

impl std::fmt::Debug for SagaRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GenerateShare { curve, .. } => f
                .debug_struct("GenerateShare")
                .field("curve", curve)
                .field("password", &"<redacted>")
                .finish(),
            Self::RecoverShare { curve, .. } => f
                .debug_struct("RecoverShare")
                .field("curve", curve)
                .field("password", &"<redacted>")
                .finish(),
            Self::Sign { share, message } => f
                .debug_struct("Sign")
                .field("share", share)
                .field("message", message)
                .finish(),
        }
    }
}

/// Tagged result of a saga run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaOutcome {
    GenerateShare(KeyShare),
    RecoverShare(KeyShare),
    Signature(String),
}

/// Orchestrator for generating, recovering and using threshold key shares.
///
/// Holds no per-run state: key ids, tokens and share material live only in
/// the call chain of one invocation, so one saga can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct KeyShareSaga<W, M> {
    backend: W,
    mpc: M,
    nodes: NodeEndpoints,
}

impl<M: MpcNodeClient> KeyShareSaga<WaasClient, M> {
    /// Assemble a saga backed by [`WaasClient`] from settings.
    ///
    /// A missing backend URL or node endpoint is an [`KeyShareError::Unknown`]:
    /// the saga cannot run without its collaborators.
    pub fn from_settings(settings: &Settings, mpc: M) -> KeyShareResult<Self> {
        let base_url = settings
            .waas_base_url()
            .ok_or_else(|| KeyShareError::Unknown("wallet backend is not configured".to_string()))?;

        let nodes = match (settings.node1_url(), settings.node2_url()) {
            (Some(node1), Some(node2)) => NodeEndpoints::new(node1, node2),
            _ => {
                return Err(KeyShareError::Unknown(
                    "MPC node endpoints are not configured".to_string(),
                ));
            }
        };

        let backend = WaasClient::new(base_url, settings.request_timeout())?;

        tracing::info!(
            backend = %base_url,
            node1 = %nodes.node1_url,
            node2 = %nodes.node2_url,
            "Key share saga configured"
        );

        Ok(Self::new(backend, mpc, nodes))
    }
}

impl<W: WalletBackend, M: MpcNodeClient> KeyShareSaga<W, M> {
    pub fn new(backend: W, mpc: M, nodes: NodeEndpoints) -> Self {
        Self {
            backend,
            mpc,
            nodes,
        }
    }

    pub fn backend(&self) -> &W {
        &self.backend
    }

    pub fn mpc(&self) -> &M {
        &self.mpc
    }

    pub fn nodes(&self) -> &NodeEndpoints {
        &self.nodes
    }

    // =========================================================================
    // Workflows
    // =========================================================================

    /// Generate a new threshold key share for `curve` and register its public key.
    #[tracing::instrument(skip(self, access_token, password), fields(curve = %curve))]
    pub async fn generate_key_share(
        &self,
        access_token: &str,
        curve: Curve,
        password: &str,
    ) -> KeyShareResult<KeyShare> {
        let keys = self.backend.get_wallet_keys(access_token).await?;
        gates::ensure_no_key_for_curve(&keys, curve)?;

        let key_id = self.allocate_key_id().await?;
        let token = self.backend.get_wallet_token(access_token, &key_id).await?;

        tracing::debug!(key_id = %key_id, "Starting two-node key generation");
        let share = self
            .mpc
            .generate_share(GenerateShareParams {
                node1_url: &self.nodes.node1_url,
                node2_url: &self.nodes.node2_url,
                key_id: &key_id,
                token: &token.token,
                curve,
                password,
            })
            .await?;
        ensure_share_matches(&share, &key_id, curve)?;

        let key_share = self.publish(access_token, share).await?;

        tracing::info!(key_id = %key_share.share.key_id, "Key share generated");
        Ok(key_share)
    }

    /// Recover a key share for `curve` under a new key id.
    ///
    /// The share is rebuilt node-side from the first registered key for the
    /// curve; no local copy of the old share is needed.
    #[tracing::instrument(skip(self, access_token, password), fields(curve = %curve))]
    pub async fn recover_key_share(
        &self,
        access_token: &str,
        curve: Curve,
        password: &str,
    ) -> KeyShareResult<KeyShare> {
        let keys = self.backend.get_wallet_keys(access_token).await?;
        let source_key_id = gates::find_source_key(&keys, curve)?.id.clone();

        let target_key_id = self.allocate_key_id().await?;
        if target_key_id == source_key_id {
            return Err(MpcError::KeyIdGeneration(format!(
                "allocated key id {target_key_id} collides with the key being recovered"
            ))
            .into());
        }

        let token = self
            .backend
            .get_wallet_token(access_token, &target_key_id)
            .await?;

        tracing::debug!(
            source_key_id = %source_key_id,
            target_key_id = %target_key_id,
            "Starting two-node key recovery"
        );
        let share = self
            .mpc
            .recover_share(RecoverShareParams {
                node1_url: &self.nodes.node1_url,
                node2_url: &self.nodes.node2_url,
                token: &token.token,
                target_key_id: &target_key_id,
                source_key_id: &source_key_id,
                curve,
                password,
            })
            .await?;
        ensure_share_matches(&share, &target_key_id, curve)?;

        let key_share = self.publish(access_token, share).await?;

        tracing::info!(
            source_key_id = %source_key_id,
            key_id = %key_share.share.key_id,
            "Key share recovered"
        );
        Ok(key_share)
    }

    /// Sign `message` with an existing share. Only node 1 takes part.
    #[tracing::instrument(
        skip(self, access_token, encrypted_share, secret_store, message),
        fields(curve = %curve)
    )]
    pub async fn sign(
        &self,
        access_token: &str,
        key_id: &str,
        encrypted_share: &str,
        secret_store: &str,
        curve: Curve,
        message: &str,
    ) -> KeyShareResult<String> {
        let token = self.backend.get_wallet_token(access_token, key_id).await?;

        let signature = self
            .mpc
            .sign(SignParams {
                node1_url: &self.nodes.node1_url,
                token: &token.token,
                key_id,
                encrypted_share,
                secret_store,
                curve,
                message,
            })
            .await?;

        tracing::info!("Message signed");
        Ok(signature)
    }

    /// Check a password against a secret store without contacting the nodes.
    pub async fn validate_password(
        &self,
        password: &str,
        secret_store: &str,
    ) -> KeyShareResult<ValidationReport> {
        Ok(self
            .mpc
            .validate_password_and_secret_store(password, secret_store)
            .await?)
    }

    /// Check a share against its secret store without contacting the nodes.
    pub async fn validate_share(
        &self,
        encrypted_share: &str,
        secret_store: &str,
    ) -> KeyShareResult<ValidationReport> {
        Ok(self
            .mpc
            .validate_share_and_secret_store(encrypted_share, secret_store)
            .await?)
    }

    /// Register an already generated share's public key.
    ///
    /// Retry path for a run whose final registration failed.
    #[tracing::instrument(skip(self, access_token, share, public_key), fields(key_id = %share.key_id))]
    pub async fn register_key(
        &self,
        access_token: &str,
        share: &ShareMaterial,
        public_key: &str,
    ) -> KeyShareResult<KeyRecord> {
        Ok(self
            .backend
            .register_wallet_key(access_token, &share.key_id, share.curve.as_str(), public_key)
            .await?)
    }

    /// Run one saga chosen at runtime.
    pub async fn execute(
        &self,
        access_token: &str,
        request: SagaRequest,
    ) -> KeyShareResult<SagaOutcome> {
        match request {
            SagaRequest::GenerateShare { curve, password } => self
                .generate_key_share(access_token, curve, &password)
                .await
                .map(SagaOutcome::GenerateShare),
            SagaRequest::RecoverShare { curve, password } => self
                .recover_key_share(access_token, curve, &password)
                .await
                .map(SagaOutcome::RecoverShare),
            SagaRequest::Sign { share, message } => self
                .sign(
                    access_token,
                    &share.key_id,
                    &share.encrypted_share,
                    &share.secret_store,
                    share.curve,
                    &message,
                )
                .await
                .map(SagaOutcome::Signature),
        }
    }

    // =========================================================================
    // Steps shared by generate and recover
    // =========================================================================

    async fn allocate_key_id(&self) -> KeyShareResult<String> {
        let key_id = self.mpc.generate_key_id().await?;
        if key_id.trim().is_empty() {
            return Err(MpcError::KeyIdGeneration("node returned an empty key id".to_string()).into());
        }
        Ok(key_id)
    }

    /// Derive the public key and register it.
    async fn publish(&self, access_token: &str, share: ShareMaterial) -> KeyShareResult<KeyShare> {
        let public_key = self.mpc.derive_public_key(&share).await?;

        let record = self
            .register_key(access_token, &share, &public_key)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    key_id = %share.key_id,
                    error = %e,
                    "Registration failed after the nodes produced a share; node-side key is orphaned"
                );
            })?;

        Ok(KeyShare {
            share,
            public_key,
            record,
        })
    }
}

/// The nodes must hand back a share for the key id and curve that were requested.
fn ensure_share_matches(share: &ShareMaterial, key_id: &str, curve: Curve) -> KeyShareResult<()> {
    if share.key_id != key_id {
        return Err(MpcError::Protocol(format!(
            "node returned share for key {}, expected {key_id}",
            share.key_id
        ))
        .into());
    }
    if share.curve != curve {
        return Err(MpcError::Protocol(format!(
            "node returned {} share for key {key_id}, expected {curve}",
            share.curve
        ))
        .into());
    }
    Ok(())
}
