//! # Trellis Projects
//!
//! Project service for Trellis: reconciles projects owned by the legacy
//! orchestrator with natively stored projects, enriches them with
//! statistics and localized labels, and provides CRUD over native projects.

pub mod context;
pub mod gateway;
pub mod localizer;
pub mod manager;
pub mod merge;
pub mod ordering;
pub mod permission;
pub mod statistics;
pub mod upstream;

#[cfg(test)]
pub mod test_utils;

// Re-export main types from core
pub use trellis_core::{
    generate_tenant_id, Project, ProjectCreateInput, ProjectKind, ProjectOverview,
    ProjectStatistics, ProjectUpdateInput, TenantRelationship, Workspace,
};

pub use context::RequestContext;
pub use gateway::{HttpLegacyGateway, LegacyProjectGateway, LegacyProjectRecord};
pub use localizer::{CatalogLocalizer, DisplayLocalizer, DisplayNames, DisplayText};
pub use manager::{Collaborators, ManagerError, ManagerOptions, ManagerResult, ProjectsManager};
pub use merge::{convert_legacy_project, merge_native, ProjectMerger};
pub use ordering::{compare_by_activity, sort_projects};
pub use permission::{HttpPermissionChecker, PermissionCheck, PermissionChecker};
pub use statistics::{HttpStatisticsProvider, StatisticsProvider};
pub use upstream::UpstreamError;

// Re-export storage types and traits
pub use trellis_storage::{
    MonitorStore, ProjectRecord, ProjectStore, SqliteProjectStore, StorageConfig, StorageError,
    StorageResult, TenantRecord,
};

// Re-export configuration
pub use trellis_config::{init_tracing, Config, ConfigError};
