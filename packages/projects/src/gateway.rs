// ABOUTME: Legacy project gateway: projects still owned by the external orchestrator
// ABOUTME: Trait consumed by the manager plus the default HTTP adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::upstream::{build_http_client, read_envelope, UpstreamError};

/// Project as reported by the orchestrator.
///
/// `envs` and `tenant_groups` are parallel arrays: index `i` of one pairs
/// with index `i` of the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProjectRecord {
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub project_desc: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub envs: Vec<String>,
    #[serde(default)]
    pub tenant_groups: Vec<String>,
}

#[async_trait]
pub trait LegacyProjectGateway: Send + Sync {
    /// Fetch the legacy records for `project_ids` in one batched call
    async fn fetch_by_ids(
        &self,
        org_id: &str,
        user_id: &str,
        project_ids: &[String],
    ) -> Result<Vec<LegacyProjectRecord>, UpstreamError>;
}

/// Orchestrator client speaking the microservice-projects endpoint
#[derive(Clone)]
pub struct HttpLegacyGateway {
    http_client: Client,
    base_url: String,
}

impl HttpLegacyGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl LegacyProjectGateway for HttpLegacyGateway {
    async fn fetch_by_ids(
        &self,
        org_id: &str,
        user_id: &str,
        project_ids: &[String],
    ) -> Result<Vec<LegacyProjectRecord>, UpstreamError> {
        let url = format!("{}/api/microservice/projects", self.base_url);
        let query: Vec<(&str, &str)> = project_ids
            .iter()
            .map(|id| ("projectId", id.as_str()))
            .collect();

        let response = self
            .http_client
            .get(&url)
            .header("Org-ID", org_id)
            .header("User-ID", user_id)
            .query(&query)
            .send()
            .await?;

        let records: Vec<LegacyProjectRecord> = read_envelope(response).await?;
        debug!(
            "Orchestrator returned {} legacy projects for {} ids",
            records.len(),
            project_ids.len()
        );
        Ok(records)
    }
}
