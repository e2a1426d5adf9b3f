// Crate-level lint configuration
#![allow(clippy::multiple_crate_versions)] // Transitive deps, can't easily fix
#![allow(clippy::missing_errors_doc)] // Every public fn returns the same documented error types
#![allow(clippy::must_use_candidate)] // Too many false positives for getters
#![allow(clippy::module_name_repetitions)] // Acceptable for clarity (e.g., WaasClient in waas mod)
#![allow(clippy::doc_markdown)] // Too strict about backticks in docs
#![allow(clippy::too_many_arguments)] // sign() mirrors the node protocol's parameter list

//! WaaS Key-Share Client
//!
//! Client-side orchestration of a threshold-signature wallet: generating,
//! recovering and using a key share held jointly by the client and two MPC
//! nodes, with the resulting public key registered at a wallet backend.
//! No full private key is ever assembled in one place.
//!
//! ## Architecture
//!
//! - **Wallet backend** ([`waas`]): key registry and per-key session tokens.
//! - **MPC nodes** ([`mpc`]): the node protocol, behind the [`MpcNodeClient`] trait.
//! - **Saga** ([`saga`]): sequences both, gates on the registry snapshot, and
//!   maps every failure into one [`KeyShareError`].
//! - **Auth backend** ([`auth`]): issues the access token the saga consumes.
//!
//! ## Error model
//!
//! Every saga operation returns `Result<_, KeyShareError>` tagged as backend,
//! node, policy violation or unknown. The first failing step ends the run.

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
mod http;
pub mod mpc;
pub mod saga;
pub mod waas;

#[cfg(feature = "otel")]
pub mod telemetry;

#[cfg(not(feature = "otel"))]
pub mod telemetry {
    //! Console-only telemetry when OpenTelemetry is disabled.

    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    /// Initialize tracing with console output only.
    ///
    /// Safe to call more than once; only the first call installs a subscriber.
    pub fn init_tracing() {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "waas_keyshare=info".into());
        let fmt_layer = tracing_subscriber::fmt::layer();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    }

    /// No-op shutdown when OpenTelemetry is disabled.
    pub fn shutdown_tracing() {}
}

// Re-export commonly used types
pub use auth::AuthClient;
pub use config::{Curve, Settings};
pub use error::{ApiError, ErrorKind, KeyShareError, KeyShareResult, MpcError};
pub use mpc::{MpcNodeClient, NodeEndpoints, ShareMaterial, ValidationReport};
pub use saga::{KeyShare, KeyShareSaga, SagaOutcome, SagaRequest};
pub use waas::{KeyRecord, WaasClient, WalletBackend};
