//! Error types for the key-share client.
//!
//! Two collaborator error types feed one saga error:
//!
//! - [`ApiError`]: wallet and auth backend failures (transport, HTTP status,
//!   decoding, envelope code).
//! - [`MpcError`]: MPC node failures.
//! - [`KeyShareError`]: what every saga operation returns. The `From`
//!   conversions are the only translation from collaborator errors, so a given
//!   failure maps to the same tag no matter which step raised it.

use serde::Serialize;
use thiserror::Error;

/// Wallet/auth backend error.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decoding error: {message}")]
    Decoding { message: String, body: String },

    #[error("Backend rejected request (code {code}): {msg}")]
    Api { code: i64, msg: String },

    #[error("No data in response")]
    NoData,

    #[error("Failed to initialize client: {0}")]
    ClientInitialization(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Registration conflicts are the backend's answer to a duplicate
    /// `(user, curve)` that slipped past the client-side gate.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Unreachable(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            Self::Unreachable(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            Self::Decoding {
                message: err.to_string(),
                body: String::new(),
            }
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// MPC node error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MpcError {
    #[error("Key ID generation failed: {0}")]
    KeyIdGeneration(String),

    #[error("MPC protocol failed: {0}")]
    Protocol(String),

    #[error("MPC node unreachable: {0}")]
    NodeUnreachable(String),

    #[error("Invalid share: {0}")]
    InvalidShare(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Coarse tag of a [`KeyShareError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wallet registry transport, decode or logical failure.
    Backend,
    /// MPC protocol transport or logical failure.
    Node,
    /// Duplicate-key or required-key gate rejected the request.
    PolicyViolation,
    /// Unclassified failure, e.g. a missing collaborator.
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend => write!(f, "backend_error"),
            Self::Node => write!(f, "node_error"),
            Self::PolicyViolation => write!(f, "policy_violation"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Unified saga error.
#[derive(Error, Debug)]
pub enum KeyShareError {
    #[error("Waas error: {0}")]
    Backend(#[from] ApiError),

    #[error("Mpc error: {0}")]
    Node(#[from] MpcError),

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

impl KeyShareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Backend(_) => ErrorKind::Backend,
            Self::Node(_) => ErrorKind::Node,
            Self::PolicyViolation(_) => ErrorKind::PolicyViolation,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Stable error code for callers that surface errors to their own clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Backend(ApiError::Unreachable(_)) => "BACKEND_UNREACHABLE",
            Self::Backend(ApiError::Status { status: 409, .. }) => "BACKEND_CONFLICT",
            Self::Backend(ApiError::Api { .. }) => "BACKEND_REJECTED",
            Self::Backend(ApiError::NoData) => "BACKEND_NO_DATA",
            Self::Backend(ApiError::Decoding { .. }) => "BACKEND_DECODING_ERROR",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::Node(MpcError::NodeUnreachable(_)) => "NODE_UNREACHABLE",
            Self::Node(_) => "NODE_ERROR",
            Self::PolicyViolation(_) => "POLICY_VIOLATION",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }
}

/// Result type alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for MPC node calls.
pub type MpcResult<T> = Result<T, MpcError>;

/// Result type alias for saga operations.
pub type KeyShareResult<T> = Result<T, KeyShareError>;
