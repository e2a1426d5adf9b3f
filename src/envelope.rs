//! Response envelope shared by the wallet and auth backends.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Success code used by both backends.
pub const SUCCESS_CODE: i64 = 0;

/// `{code, msg, data}` wrapper around every backend payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn failure(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Unwrap the payload. A non-zero code or a missing `data` is a failure.
    pub fn into_data(self) -> ApiResult<T> {
        if !self.is_success() {
            return Err(ApiError::Api {
                code: self.code,
                msg: self.msg,
            });
        }
        self.data.ok_or(ApiError::NoData)
    }

    /// Check the code only, for endpoints whose payload is empty.
    pub fn into_ack(self) -> ApiResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ApiError::Api {
                code: self.code,
                msg: self.msg,
            })
        }
    }
}

/// Placeholder payload for endpoints that answer with no data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyResponse {}
