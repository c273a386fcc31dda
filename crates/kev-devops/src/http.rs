//! Shared HTTP response helpers.

use crate::error::DevOpsError;

/// Return the response unchanged on success, otherwise
/// [`DevOpsError::Http`] carrying the status code and response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, DevOpsError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "tracking service returned an error");
        return Err(DevOpsError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

/// Read the body and decode it as JSON, mapping shape errors to
/// [`DevOpsError::Parse`].
pub async fn decode_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, DevOpsError> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| DevOpsError::Parse(e.to_string()))
}
