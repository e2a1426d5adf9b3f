//! MPC node access.
//!
//! The node protocol (distributed key generation, share encryption, signature
//! computation) lives behind [`MpcNodeClient`]. The saga only sequences calls
//! and treats share material as opaque.

pub mod types;

pub use types::{
    GenerateShareParams, NodeEndpoints, RecoverShareParams, ShareMaterial, SignParams,
    ValidationReport,
};

use crate::error::MpcResult;

/// Operations offered by the MPC node protocol library.
///
/// `generate_share` and `recover_share` run a ceremony across both nodes and
/// return once both have converged. `sign` needs only node 1 plus the
/// client-held share. The two validators are offline checks.
#[allow(async_fn_in_trait)]
pub trait MpcNodeClient {
    /// Allocate a fresh key id.
    async fn generate_key_id(&self) -> MpcResult<String>;

    async fn generate_share(&self, params: GenerateShareParams<'_>) -> MpcResult<ShareMaterial>;

    async fn recover_share(&self, params: RecoverShareParams<'_>) -> MpcResult<ShareMaterial>;

    /// Derive the public key from a share.
    async fn derive_public_key(&self, share: &ShareMaterial) -> MpcResult<String>;

    async fn sign(&self, params: SignParams<'_>) -> MpcResult<String>;

    async fn validate_password_and_secret_store(
        &self,
        password: &str,
        secret_store: &str,
    ) -> MpcResult<ValidationReport>;

    async fn validate_share_and_secret_store(
        &self,
        encrypted_share: &str,
        secret_store: &str,
    ) -> MpcResult<ValidationReport>;
}
