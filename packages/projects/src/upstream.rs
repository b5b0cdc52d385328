//! Shared plumbing for the HTTP adapters of remote collaborators

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to a remote collaborator
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl UpstreamError {
    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, UpstreamError::Network(_))
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Error body carried by a failed envelope
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: String,
}

/// Response envelope shared by the orchestrator, metrics and permission services
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub err: Option<ApiErrorBody>,
}

impl<T: Default> ApiResponse<T> {
    /// Unwrap the payload; a successful envelope without data yields `T::default()`
    pub fn into_result(self, status: u16) -> Result<T, UpstreamError> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            let message = self
                .err
                .map(|e| format!("{}: {}", e.code, e.msg))
                .unwrap_or_else(|| "Unknown API error".to_string());
            Err(UpstreamError::Api { status, message })
        }
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::Configuration(e.to_string()))
}

/// Decode an enveloped response, mapping non-2xx statuses to [`UpstreamError::Api`]
pub(crate) async fn read_envelope<T>(response: Response) -> Result<T, UpstreamError>
where
    T: DeserializeOwned + Default,
{
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.err)
            .map(|e| e.msg)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| status.to_string());
        return Err(UpstreamError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
    envelope.into_result(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_without_data_defaults() {
        let envelope: ApiResponse<Vec<String>> =
            serde_json::from_str(r#"{"success": true, "data": null}"#).unwrap();
        assert!(envelope.into_result(200).unwrap().is_empty());
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let envelope: ApiResponse<Vec<String>> = serde_json::from_str(
            r#"{"success": false, "err": {"code": "AccessDenied", "msg": "no access"}}"#,
        )
        .unwrap();

        match envelope.into_result(200) {
            Err(UpstreamError::Api { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "AccessDenied: no access");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}
