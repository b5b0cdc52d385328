use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use trellis_core::ProjectStatistics;

use crate::upstream::{build_http_client, read_envelope, UpstreamError};

/// Source of per-project aggregate counters
#[async_trait]
pub trait StatisticsProvider: Send + Sync {
    async fn fetch_stats(
        &self,
        org_id: &str,
        project_ids: &[String],
    ) -> Result<HashMap<String, ProjectStatistics>, UpstreamError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsRequest<'a> {
    org_id: &'a str,
    project_ids: &'a [String],
}

/// Metrics service client
#[derive(Clone)]
pub struct HttpStatisticsProvider {
    http_client: Client,
    base_url: String,
}

impl HttpStatisticsProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl StatisticsProvider for HttpStatisticsProvider {
    async fn fetch_stats(
        &self,
        org_id: &str,
        project_ids: &[String],
    ) -> Result<HashMap<String, ProjectStatistics>, UpstreamError> {
        let url = format!("{}/api/msp/projects/statistics", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header("Org-ID", org_id)
            .json(&StatisticsRequest {
                org_id,
                project_ids,
            })
            .send()
            .await?;

        read_envelope(response).await
    }
}
