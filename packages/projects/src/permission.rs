// ABOUTME: Permission checks against the platform's access-control service
// ABOUTME: Only project-scoped GET checks are issued by the project service

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::upstream::{build_http_client, read_envelope, UpstreamError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    Project,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionAction {
    Get,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionCheck {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub scope: PermissionScope,
    #[serde(rename = "scopeID")]
    pub scope_id: u64,
    pub action: PermissionAction,
    pub resource: String,
}

impl PermissionCheck {
    /// "May `user_id` read project `project_id`?"
    pub fn project_get(user_id: &str, project_id: u64) -> Self {
        Self {
            user_id: user_id.to_string(),
            scope: PermissionScope::Project,
            scope_id: project_id,
            action: PermissionAction::Get,
            resource: "project".to_string(),
        }
    }
}

#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn check(&self, request: &PermissionCheck) -> Result<bool, UpstreamError>;
}

#[derive(Debug, Default, Deserialize)]
struct PermissionCheckResult {
    #[serde(default)]
    access: bool,
}

#[derive(Clone)]
pub struct HttpPermissionChecker {
    http_client: Client,
    base_url: String,
}

impl HttpPermissionChecker {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PermissionChecker for HttpPermissionChecker {
    async fn check(&self, request: &PermissionCheck) -> Result<bool, UpstreamError> {
        let url = format!("{}/api/permissions/actions/check", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header("User-ID", &request.user_id)
            .json(request)
            .send()
            .await?;

        let result: PermissionCheckResult = read_envelope(response).await?;
        Ok(result.access)
    }
}
