// ABOUTME: Unified project view types shared across Trellis packages
// ABOUTME: Projects, tenant relationships, statistics, and the closed workspace/kind enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment a tenant is bound to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Workspace {
    Dev,
    Test,
    Staging,
    Prod,
    Default,
}

impl Workspace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Workspace::Dev => "DEV",
            Workspace::Test => "TEST",
            Workspace::Staging => "STAGING",
            Workspace::Prod => "PROD",
            Workspace::Default => "DEFAULT",
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workspace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEV" => Ok(Workspace::Dev),
            "TEST" => Ok(Workspace::Test),
            "STAGING" => Ok(Workspace::Staging),
            "PROD" => Ok(Workspace::Prod),
            "DEFAULT" => Ok(Workspace::Default),
            _ => Err(format!("unknown workspace: {}", s)),
        }
    }
}

/// Kind of project; `Msp` projects own their tenants, `Dop` projects come from the orchestrator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectKind {
    Dop,
    Msp,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Dop => "DOP",
            ProjectKind::Msp => "MSP",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DOP" => Ok(ProjectKind::Dop),
            "MSP" => Ok(ProjectKind::Msp),
            _ => Err(format!("unknown project kind: {}", s)),
        }
    }
}

/// Binding of a project to one deployment environment.
///
/// `workspace` keeps the raw environment name: legacy records may carry
/// names outside the [`Workspace`] set, which then render with an empty
/// display text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TenantRelationship {
    pub workspace: String,
    pub display_workspace: String,
    pub tenant_id: String,
}

/// Unified project view merged from native and legacy sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo_url: String,
    pub kind: ProjectKind,
    #[serde(default)]
    pub display_kind: String,
    /// Creation time, nanoseconds since the Unix epoch
    pub create_time: i64,
    /// Last update time, nanoseconds since the Unix epoch
    #[serde(default)]
    pub update_time: i64,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub service_count: i64,
    /// Last observed activity, milliseconds since the Unix epoch
    #[serde(default)]
    pub last_active_time: i64,
    #[serde(default)]
    pub last24h_alert_count: i64,
    #[serde(default)]
    pub relationship: Vec<TenantRelationship>,
}

impl Project {
    /// A project without any environment binding is incomplete and never listed
    pub fn has_relationships(&self) -> bool {
        !self.relationship.is_empty()
    }

    pub fn apply_statistics(&mut self, stats: &ProjectStatistics) {
        self.service_count = stats.service_count;
        self.last_active_time = stats.last_active_time;
        self.last24h_alert_count = stats.last24h_alert_count;
    }
}

/// Aggregate counters for a single project, produced fresh per request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    pub service_count: i64,
    pub last_active_time: i64,
    pub last24h_alert_count: i64,
}

/// Summary over a list of projects
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    pub project_count: i64,
    pub workspace_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateInput {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateInput {
    pub name: String,
    pub display_name: String,
}
