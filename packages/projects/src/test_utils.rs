//! Test doubles and fixtures for the project service

#[cfg(test)]
pub mod test_helpers {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::Arc;
    use trellis_core::{generate_tenant_id, ProjectCreateInput, ProjectKind, ProjectStatistics};
    use trellis_storage::{
        MonitorStore, ProjectRecord, ProjectStore, StorageResult, TenantRecord,
    };

    use crate::gateway::{LegacyProjectGateway, LegacyProjectRecord};
    use crate::localizer::CatalogLocalizer;
    use crate::manager::{Collaborators, ManagerOptions, ProjectsManager};
    use crate::permission::{PermissionCheck, PermissionChecker};
    use crate::statistics::StatisticsProvider;
    use crate::upstream::UpstreamError;

    mock! {
        pub Store {}

        #[async_trait]
        impl ProjectStore for Store {
            async fn get_project(&self, id: &str) -> StorageResult<Option<ProjectRecord>>;
            async fn create_project(&self, project: ProjectRecord) -> StorageResult<ProjectRecord>;
            async fn update_project(&self, project: ProjectRecord) -> StorageResult<ProjectRecord>;
            async fn delete_project(&self, id: &str) -> StorageResult<()>;
            async fn create_tenant(&self, tenant: TenantRecord) -> StorageResult<TenantRecord>;
            async fn list_tenants_by_project(&self, project_id: &str) -> StorageResult<Vec<TenantRecord>>;
            async fn delete_tenant(&self, tenant_id: &str) -> StorageResult<()>;
        }
    }

    mock! {
        pub Monitors {}

        #[async_trait]
        impl MonitorStore for Monitors {
            async fn list_monitor_keys(&self, project_id: i64) -> StorageResult<Vec<String>>;
        }
    }

    mock! {
        pub Gateway {}

        #[async_trait]
        impl LegacyProjectGateway for Gateway {
            async fn fetch_by_ids(
                &self,
                org_id: &str,
                user_id: &str,
                project_ids: &[String],
            ) -> Result<Vec<LegacyProjectRecord>, UpstreamError>;
        }
    }

    mock! {
        pub Statistics {}

        #[async_trait]
        impl StatisticsProvider for Statistics {
            async fn fetch_stats(
                &self,
                org_id: &str,
                project_ids: &[String],
            ) -> Result<HashMap<String, ProjectStatistics>, UpstreamError>;
        }
    }

    mock! {
        pub Permissions {}

        #[async_trait]
        impl PermissionChecker for Permissions {
            async fn check(&self, request: &PermissionCheck) -> Result<bool, UpstreamError>;
        }
    }

    /// One mock per collaborator, turned into a manager once expectations are set
    pub struct MockCollaborators {
        pub store: MockStore,
        pub monitors: MockMonitors,
        pub gateway: MockGateway,
        pub statistics: MockStatistics,
        pub permissions: MockPermissions,
    }

    impl MockCollaborators {
        pub fn new() -> Self {
            Self {
                store: MockStore::new(),
                monitors: MockMonitors::new(),
                gateway: MockGateway::new(),
                statistics: MockStatistics::new(),
                permissions: MockPermissions::new(),
            }
        }

        /// Native project `id` exists with one tenant per listed workspace
        pub fn expect_native(&mut self, id: &str, kind: ProjectKind, workspaces: &[&str]) {
            let record = native_record(id, kind);
            let tenants: Vec<TenantRecord> = workspaces
                .iter()
                .map(|workspace| tenant_record(id, kind, workspace))
                .collect();

            let expected_id = id.to_string();
            self.store
                .expect_get_project()
                .withf(move |requested| requested == expected_id)
                .returning(move |_| Ok(Some(record.clone())));

            let expected_id = id.to_string();
            self.store
                .expect_list_tenants_by_project()
                .withf(move |requested| requested == expected_id)
                .returning(move |_| Ok(tenants.clone()));
        }

        /// Native project `id` does not exist
        pub fn expect_absent(&mut self, id: &str) {
            let expected_id = id.to_string();
            self.store
                .expect_get_project()
                .withf(move |requested| requested == expected_id)
                .returning(|_| Ok(None));
        }

        pub fn into_manager(self) -> ProjectsManager {
            ProjectsManager::new(
                Collaborators {
                    store: Arc::new(self.store),
                    monitors: Arc::new(self.monitors),
                    gateway: Arc::new(self.gateway),
                    statistics: Arc::new(self.statistics),
                    permissions: Arc::new(self.permissions),
                    localizer: Arc::new(CatalogLocalizer::with_builtin("en")),
                },
                ManagerOptions::default(),
            )
        }
    }

    pub fn native_record(id: &str, kind: ProjectKind) -> ProjectRecord {
        let created_at = Utc.timestamp_opt(1_690_000_000, 0).unwrap();
        ProjectRecord {
            id: id.to_string(),
            name: format!("native-{}", id),
            display_name: format!("Native {}", id),
            kind,
            created_at,
            updated_at: created_at,
            is_deleted: false,
        }
    }

    pub fn tenant_record(project_id: &str, kind: ProjectKind, workspace: &str) -> TenantRecord {
        let created_at = Utc.timestamp_opt(1_690_000_000, 0).unwrap();
        TenantRecord {
            id: generate_tenant_id(project_id, kind.as_str(), workspace),
            kind,
            related_project_id: project_id.to_string(),
            related_workspace: workspace.to_string(),
            created_at,
            updated_at: created_at,
            is_deleted: false,
        }
    }

    pub fn legacy_record(id: &str, envs: &[&str], tenant_groups: &[&str]) -> LegacyProjectRecord {
        LegacyProjectRecord {
            project_id: id.to_string(),
            project_name: format!("legacy-{}", id),
            project_desc: format!("legacy description of {}", id),
            logo_url: format!("https://cdn.example.com/{}.png", id),
            create_time: Utc.timestamp_opt(1_680_000_000, 0).unwrap(),
            envs: envs.iter().map(|s| s.to_string()).collect(),
            tenant_groups: tenant_groups.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn create_input(id: &str, kind: &str) -> ProjectCreateInput {
        ProjectCreateInput {
            id: id.to_string(),
            name: format!("project-{}", id),
            kind: kind.to_string(),
            display_name: format!("Project {}", id),
        }
    }
}
