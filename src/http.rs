//! Shared reqwest plumbing for the backend clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::envelope::ApiResponse;
use crate::error::{ApiError, ApiResult};

/// Longest response body kept in error messages.
const ERROR_BODY_LIMIT: usize = 512;

/// Build the HTTP client used for one backend.
pub(crate) fn build_client(timeout: Duration) -> ApiResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::ClientInitialization(format!("Failed to create HTTP client: {e}")))
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn truncate(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// Send a request and decode the `{code, msg, data}` envelope.
///
/// Non-2xx answers become [`ApiError::Status`] unless the body is itself an
/// envelope carrying a non-zero code, in which case the backend's own code
/// and message win.
pub(crate) async fn send_envelope<T: DeserializeOwned>(
    request: RequestBuilder,
    operation: &'static str,
) -> ApiResult<ApiResponse<T>> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(operation, error = %e, "Backend request failed");
        ApiError::from(e)
    })?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(operation, status = status.as_u16(), "Backend returned error status");
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            && !envelope.is_success()
            && status.as_u16() != 409
        {
            return Err(ApiError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: truncate(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(operation, error = %e, "Failed to decode backend response");
        ApiError::Decoding {
            message: format!("{operation}: {e}"),
            body: truncate(&body),
        }
    })
}

/// Send a request and return the envelope's payload.
pub(crate) async fn send_data<T: DeserializeOwned>(
    request: RequestBuilder,
    operation: &'static str,
) -> ApiResult<T> {
    send_envelope(request, operation).await?.into_data()
}
