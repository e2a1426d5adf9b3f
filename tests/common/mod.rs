//! Shared fakes for saga tests.
//!
//! `FakeBackend` and `FakeMpc` write every call into one shared log so tests
//! can assert the exact cross-system order. Any step can be made to fail or
//! to hang forever.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use waas_keyshare::error::{ApiError, ApiResult, MpcError, MpcResult};
use waas_keyshare::mpc::{
    GenerateShareParams, MpcNodeClient, NodeEndpoints, RecoverShareParams, ShareMaterial,
    SignParams, ValidationReport,
};
use waas_keyshare::waas::{KeyRecord, WalletBackend, WalletKeySet, WalletToken};
use waas_keyshare::{Curve, KeyShareSaga};

pub const NODE1_URL: &str = "http://node-1.test";
pub const NODE2_URL: &str = "http://node-2.test";

/// A step either fake can be told to fail or hang on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    WalletKeys,
    WalletToken,
    Register,
    KeyId,
    GenerateShare,
    RecoverShare,
    PublicKey,
    Sign,
    ValidatePassword,
    ValidateShare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetWalletKeys {
        access_token: String,
    },
    GetWalletToken {
        access_token: String,
        key_id: String,
    },
    RegisterWalletKey {
        access_token: String,
        key_id: String,
        curve: String,
        public_key: String,
    },
    GenerateKeyId,
    GenerateShare {
        node1_url: String,
        node2_url: String,
        key_id: String,
        token: String,
        curve: Curve,
        password: String,
    },
    RecoverShare {
        node1_url: String,
        node2_url: String,
        token: String,
        target_key_id: String,
        source_key_id: String,
        curve: Curve,
        password: String,
    },
    DerivePublicKey {
        key_id: String,
    },
    Sign {
        node1_url: String,
        token: String,
        key_id: String,
        encrypted_share: String,
        secret_store: String,
        curve: Curve,
        message: String,
    },
    ValidatePassword {
        password: String,
        secret_store: String,
    },
    ValidateShare {
        encrypted_share: String,
        secret_store: String,
    },
}

impl Call {
    pub fn step(&self) -> Step {
        match self {
            Self::GetWalletKeys { .. } => Step::WalletKeys,
            Self::GetWalletToken { .. } => Step::WalletToken,
            Self::RegisterWalletKey { .. } => Step::Register,
            Self::GenerateKeyId => Step::KeyId,
            Self::GenerateShare { .. } => Step::GenerateShare,
            Self::RecoverShare { .. } => Step::RecoverShare,
            Self::DerivePublicKey { .. } => Step::PublicKey,
            Self::Sign { .. } => Step::Sign,
            Self::ValidatePassword { .. } => Step::ValidatePassword,
            Self::ValidateShare { .. } => Step::ValidateShare,
        }
    }
}

/// Failure and hang switches shared by both fakes.
#[derive(Debug, Default)]
struct Switches {
    failing: HashSet<Step>,
    hanging: HashSet<Step>,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
    switches: Arc<Mutex<Switches>>,
}

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls().iter().map(Call::step).collect()
    }

    pub fn count(&self, step: Step) -> usize {
        self.steps().into_iter().filter(|s| *s == step).count()
    }

    pub fn fail_on(&self, step: Step) {
        self.switches.lock().unwrap().failing.insert(step);
    }

    pub fn clear_failures(&self) {
        self.switches.lock().unwrap().failing.clear();
    }

    pub fn hang_on(&self, step: Step) {
        self.switches.lock().unwrap().hanging.insert(step);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Record `call`, then hang or report whether it should fail.
    async fn enter(&self, call: Call) -> bool {
        let step = call.step();
        self.record(call);
        let (hang, fail) = {
            let switches = self.switches.lock().unwrap();
            (
                switches.hanging.contains(&step),
                switches.failing.contains(&step),
            )
        };
        if hang {
            std::future::pending::<()>().await;
        }
        fail
    }
}

pub fn backend_failure() -> ApiError {
    ApiError::Api {
        code: 5000,
        msg: "injected backend failure".to_string(),
    }
}

pub fn node_failure() -> MpcError {
    MpcError::Protocol("injected node failure".to_string())
}

pub fn key_record(id: &str, curve: &str) -> KeyRecord {
    KeyRecord {
        id: id.to_string(),
        curve: curve.to_string(),
        public_key: format!("pk-{id}"),
        created_at: Utc::now().to_rfc3339(),
    }
}

// =============================================================================
// Wallet backend fake
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakeBackend {
    log: CallLog,
    keys: WalletKeySet,
    token: String,
}

impl WalletBackend for FakeBackend {
    async fn get_wallet_keys(&self, access_token: &str) -> ApiResult<WalletKeySet> {
        let fail = self
            .log
            .enter(Call::GetWalletKeys {
                access_token: access_token.to_string(),
            })
            .await;
        if fail {
            return Err(backend_failure());
        }
        Ok(self.keys.clone())
    }

    async fn get_wallet_token(&self, access_token: &str, key_id: &str) -> ApiResult<WalletToken> {
        let fail = self
            .log
            .enter(Call::GetWalletToken {
                access_token: access_token.to_string(),
                key_id: key_id.to_string(),
            })
            .await;
        if fail {
            return Err(backend_failure());
        }
        Ok(WalletToken {
            token: self.token.clone(),
        })
    }

    async fn register_wallet_key(
        &self,
        access_token: &str,
        key_id: &str,
        curve: &str,
        public_key: &str,
    ) -> ApiResult<KeyRecord> {
        let fail = self
            .log
            .enter(Call::RegisterWalletKey {
                access_token: access_token.to_string(),
                key_id: key_id.to_string(),
                curve: curve.to_string(),
                public_key: public_key.to_string(),
            })
            .await;
        if fail {
            return Err(backend_failure());
        }
        Ok(KeyRecord {
            id: key_id.to_string(),
            curve: curve.to_string(),
            public_key: public_key.to_string(),
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

// =============================================================================
// MPC node fake
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakeMpc {
    log: CallLog,
    pub key_id: String,
    /// Key id stamped on returned shares; defaults to the requested id.
    pub share_key_id: Option<String>,
    /// Curve stamped on returned shares; defaults to the requested curve.
    pub share_curve: Option<Curve>,
    pub public_key: String,
    pub signature: String,
}

impl FakeMpc {
    fn share(&self, key_id: &str, curve: Curve) -> ShareMaterial {
        ShareMaterial {
            key_id: self
                .share_key_id
                .clone()
                .unwrap_or_else(|| key_id.to_string()),
            encrypted_share: "E".to_string(),
            secret_store: "S".to_string(),
            curve: self.share_curve.unwrap_or(curve),
        }
    }
}

impl MpcNodeClient for FakeMpc {
    async fn generate_key_id(&self) -> MpcResult<String> {
        if self.log.enter(Call::GenerateKeyId).await {
            return Err(MpcError::KeyIdGeneration("injected node failure".to_string()));
        }
        Ok(self.key_id.clone())
    }

    async fn generate_share(&self, params: GenerateShareParams<'_>) -> MpcResult<ShareMaterial> {
        let fail = self
            .log
            .enter(Call::GenerateShare {
                node1_url: params.node1_url.to_string(),
                node2_url: params.node2_url.to_string(),
                key_id: params.key_id.to_string(),
                token: params.token.to_string(),
                curve: params.curve,
                password: params.password.to_string(),
            })
            .await;
        if fail {
            return Err(node_failure());
        }
        Ok(self.share(params.key_id, params.curve))
    }

    async fn recover_share(&self, params: RecoverShareParams<'_>) -> MpcResult<ShareMaterial> {
        let fail = self
            .log
            .enter(Call::RecoverShare {
                node1_url: params.node1_url.to_string(),
                node2_url: params.node2_url.to_string(),
                token: params.token.to_string(),
                target_key_id: params.target_key_id.to_string(),
                source_key_id: params.source_key_id.to_string(),
                curve: params.curve,
                password: params.password.to_string(),
            })
            .await;
        if fail {
            return Err(node_failure());
        }
        Ok(self.share(params.target_key_id, params.curve))
    }

    async fn derive_public_key(&self, share: &ShareMaterial) -> MpcResult<String> {
        let fail = self
            .log
            .enter(Call::DerivePublicKey {
                key_id: share.key_id.clone(),
            })
            .await;
        if fail {
            return Err(node_failure());
        }
        Ok(self.public_key.clone())
    }

    async fn sign(&self, params: SignParams<'_>) -> MpcResult<String> {
        let fail = self
            .log
            .enter(Call::Sign {
                node1_url: params.node1_url.to_string(),
                token: params.token.to_string(),
                key_id: params.key_id.to_string(),
                encrypted_share: params.encrypted_share.to_string(),
                secret_store: params.secret_store.to_string(),
                curve: params.curve,
                message: params.message.to_string(),
            })
            .await;
        if fail {
            return Err(node_failure());
        }
        Ok(self.signature.clone())
    }

    async fn validate_password_and_secret_store(
        &self,
        password: &str,
        secret_store: &str,
    ) -> MpcResult<ValidationReport> {
        let fail = self
            .log
            .enter(Call::ValidatePassword {
                password: password.to_string(),
                secret_store: secret_store.to_string(),
            })
            .await;
        if fail {
            return Err(MpcError::Validation("injected node failure".to_string()));
        }
        if password == "pw" {
            Ok(ValidationReport::valid())
        } else {
            Ok(ValidationReport::invalid("password does not match secret store"))
        }
    }

    async fn validate_share_and_secret_store(
        &self,
        encrypted_share: &str,
        secret_store: &str,
    ) -> MpcResult<ValidationReport> {
        let fail = self
            .log
            .enter(Call::ValidateShare {
                encrypted_share: encrypted_share.to_string(),
                secret_store: secret_store.to_string(),
            })
            .await;
        if fail {
            return Err(MpcError::Validation("injected node failure".to_string()));
        }
        if encrypted_share == "E" && secret_store == "S" {
            Ok(ValidationReport::valid())
        } else {
            Ok(ValidationReport::invalid("share does not match secret store"))
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

pub fn fake_mpc(log: &CallLog) -> FakeMpc {
    FakeMpc {
        log: log.clone(),
        key_id: "k1".to_string(),
        share_key_id: None,
        share_curve: None,
        public_key: "PK".to_string(),
        signature: "SIG".to_string(),
    }
}

pub fn fake_backend(log: &CallLog, keys: WalletKeySet) -> FakeBackend {
    FakeBackend {
        log: log.clone(),
        keys,
        token: "T".to_string(),
    }
}

/// Saga over fakes with the default node outputs (`k1`, `E`/`S`, `PK`, `SIG`).
pub fn test_saga(keys: WalletKeySet) -> (KeyShareSaga<FakeBackend, FakeMpc>, CallLog) {
    let log = CallLog::default();
    let saga = KeyShareSaga::new(
        fake_backend(&log, keys),
        fake_mpc(&log),
        NodeEndpoints::new(NODE1_URL, NODE2_URL),
    );
    (saga, log)
}

/// Saga over fakes with a customised MPC fake.
pub fn test_saga_with(
    keys: WalletKeySet,
    configure: impl FnOnce(&mut FakeMpc),
) -> (KeyShareSaga<FakeBackend, FakeMpc>, CallLog) {
    let log = CallLog::default();
    let mut mpc = fake_mpc(&log);
    configure(&mut mpc);
    let saga = KeyShareSaga::new(
        fake_backend(&log, keys),
        mpc,
        NodeEndpoints::new(NODE1_URL, NODE2_URL),
    );
    (saga, log)
}
