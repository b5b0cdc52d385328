use crate::context::RequestContext;
use crate::gateway::{HttpLegacyGateway, LegacyProjectGateway};
use crate::localizer::{CatalogLocalizer, DisplayLocalizer, DisplayNames, DisplayText};
use crate::merge::{convert_legacy_project, ProjectMerger};
use crate::ordering::sort_projects;
use crate::permission::{HttpPermissionChecker, PermissionCheck, PermissionChecker};
use crate::statistics::{HttpStatisticsProvider, StatisticsProvider};
use crate::upstream::UpstreamError;
use chrono::Utc;
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use trellis_config::Config;
use trellis_core::{
    generate_tenant_id, unix_nanos, validate_project_create, Project, ProjectCreateInput,
    ProjectKind, ProjectOverview, ProjectStatistics, ProjectUpdateInput, TenantRelationship,
    ValidationError, Workspace, ACTIVITY_BUCKET_MS, DEFAULT_WORKSPACE_ORDER,
};
use trellis_storage::{
    MonitorStore, ProjectRecord, ProjectStore, SqliteProjectStore, StorageConfig, StorageError,
    TenantRecord,
};

/// Manager errors
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("Statistics unavailable: {0}")]
    StatisticsUnavailable(#[source] UpstreamError),
    #[error("Request cancelled")]
    Cancelled,
}

impl From<ValidationError> for ManagerError {
    fn from(err: ValidationError) -> Self {
        ManagerError::InvalidArgument(err.to_string())
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Immutable tuning of the reconciliation
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Emission order of native tenant relationships
    pub workspace_order: Vec<Workspace>,
    /// Kind assigned to every project converted from the orchestrator
    pub legacy_kind: ProjectKind,
    /// Kind whose projects get a DEFAULT tenant provisioned on creation
    pub tenant_kind: ProjectKind,
    pub activity_bucket_ms: i64,
    pub display_names: DisplayNames,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            workspace_order: DEFAULT_WORKSPACE_ORDER.to_vec(),
            legacy_kind: ProjectKind::Dop,
            tenant_kind: ProjectKind::Msp,
            activity_bucket_ms: ACTIVITY_BUCKET_MS,
            display_names: DisplayNames::default(),
        }
    }
}

/// Handles to every external collaborator of the manager
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn ProjectStore>,
    pub monitors: Arc<dyn MonitorStore>,
    pub gateway: Arc<dyn LegacyProjectGateway>,
    pub statistics: Arc<dyn StatisticsProvider>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub localizer: Arc<dyn DisplayLocalizer>,
}

/// Unified view over native and legacy projects.
///
/// Every public operation races the caller's cancellation token; once it
/// fires, in-flight collaborator calls are dropped and
/// [`ManagerError::Cancelled`] is returned.
#[derive(Clone)]
pub struct ProjectsManager {
    store: Arc<dyn ProjectStore>,
    monitors: Arc<dyn MonitorStore>,
    gateway: Arc<dyn LegacyProjectGateway>,
    statistics: Arc<dyn StatisticsProvider>,
    permissions: Arc<dyn PermissionChecker>,
    display: DisplayText,
    options: ManagerOptions,
}

impl ProjectsManager {
    pub fn new(collaborators: Collaborators, options: ManagerOptions) -> Self {
        let display = DisplayText::new(collaborators.localizer, options.display_names.clone());
        Self {
            store: collaborators.store,
            monitors: collaborators.monitors,
            gateway: collaborators.gateway,
            statistics: collaborators.statistics,
            permissions: collaborators.permissions,
            display,
            options,
        }
    }

    /// Wire SQLite storage and the HTTP adapters described by `config`
    pub async fn from_config(config: &Config) -> ManagerResult<Self> {
        let storage_config = StorageConfig {
            path: config.database_path.clone(),
            max_connections: config.db_max_connections,
            ..StorageConfig::default()
        };
        let store = Arc::new(SqliteProjectStore::new(&storage_config).await?);
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let collaborators = Collaborators {
            store: store.clone(),
            monitors: store,
            gateway: Arc::new(HttpLegacyGateway::new(&config.legacy_gateway_url, timeout)?),
            statistics: Arc::new(HttpStatisticsProvider::new(&config.statistics_url, timeout)?),
            permissions: Arc::new(HttpPermissionChecker::new(&config.permission_url, timeout)?),
            localizer: Arc::new(CatalogLocalizer::with_builtin(&config.fallback_language)),
        };

        info!(
            "Project service initialized with database at {}",
            config.database_path.display()
        );
        Ok(Self::new(collaborators, ManagerOptions::default()))
    }

    /// Reconciled projects ordered by recent activity, then by creation time
    pub async fn get_projects(
        &self,
        ctx: &RequestContext,
        project_ids: &[String],
        include_statistics: bool,
    ) -> ManagerResult<Vec<Project>> {
        let mut projects = self
            .get_project_list(ctx, project_ids, include_statistics)
            .await?;
        sort_projects(&mut projects, self.options.activity_bucket_ms);
        Ok(projects)
    }

    /// Reconciled projects in merge order.
    ///
    /// Statistics enrichment is best effort: a failing provider leaves the
    /// counters at zero.
    pub async fn get_project_list(
        &self,
        ctx: &RequestContext,
        project_ids: &[String],
        include_statistics: bool,
    ) -> ManagerResult<Vec<Project>> {
        cancellable(ctx, self.list_projects(ctx, project_ids, include_statistics)).await
    }

    /// Native project with its tenant relationships, `None` when absent
    pub async fn get_project_info(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> ManagerResult<Option<Project>> {
        cancellable(ctx, self.load_native(id, ctx.language())).await
    }

    /// Single project visible to the caller, falling back to the orchestrator
    pub async fn get_project(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> ManagerResult<Option<Project>> {
        cancellable(ctx, async {
            let project_id = parse_project_id(id)?;
            self.authorize_project_read(ctx, project_id).await?;

            if let Some(project) = self.load_native(id, ctx.language()).await? {
                return Ok(Some(project));
            }

            debug!("Project {} not found natively, asking the orchestrator", id);
            let records = self
                .gateway
                .fetch_by_ids(
                    ctx.org_id(),
                    ctx.user_id().unwrap_or_default(),
                    &[id.to_string()],
                )
                .await?;

            Ok::<_, ManagerError>(records.first().map(|record| {
                convert_legacy_project(
                    record,
                    self.options.legacy_kind,
                    &self.display,
                    ctx.language(),
                )
            }))
        })
        .await
    }

    /// Create a native project; tenant-bearing kinds get a DEFAULT tenant
    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        input: ProjectCreateInput,
    ) -> ManagerResult<Project> {
        cancellable(ctx, async {
            let kind = validate_project_create(&input)?;
            let now = Utc::now();

            let record = self
                .store
                .create_project(ProjectRecord {
                    id: input.id,
                    name: input.name,
                    display_name: input.display_name,
                    kind,
                    created_at: now,
                    updated_at: now,
                    is_deleted: false,
                })
                .await?;
            info!("Created project '{}' with ID {}", record.name, record.id);

            let mut tenants = Vec::new();
            if kind == self.options.tenant_kind {
                let workspace = Workspace::Default.as_str();
                let tenant = TenantRecord {
                    id: generate_tenant_id(&record.id, kind.as_str(), workspace),
                    kind,
                    related_project_id: record.id.clone(),
                    related_workspace: workspace.to_string(),
                    created_at: now,
                    updated_at: now,
                    is_deleted: false,
                };

                match self.store.create_tenant(tenant).await {
                    Ok(tenant) => tenants.push(tenant),
                    Err(e) => {
                        error!(
                            "Failed to provision {} tenant for project {}: {}",
                            workspace, record.id, e
                        );
                        return Err(ManagerError::Storage(e));
                    }
                }
            }

            Ok::<_, ManagerError>(self.project_from_record(record, &tenants, ctx.language()))
        })
        .await
    }

    /// Rename a native project; `None` when the id is unknown
    pub async fn update_project(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: ProjectUpdateInput,
    ) -> ManagerResult<Option<Project>> {
        cancellable(ctx, async {
            let Some(mut record) = self.store.get_project(id).await? else {
                debug!("Update skipped, project {} not found", id);
                return Ok(None);
            };

            record.name = input.name;
            record.display_name = input.display_name;
            record.updated_at = Utc::now();

            let record = self.store.update_project(record).await?;
            let tenants = self.store.list_tenants_by_project(id).await?;
            info!("Updated project '{}' with ID {}", record.name, record.id);

            Ok::<_, ManagerError>(Some(self.project_from_record(
                record,
                &tenants,
                ctx.language(),
            )))
        })
        .await
    }

    /// Delete a native project and its tenants.
    ///
    /// Returns `false` without touching storage when the id is unknown. Not
    /// atomic: a failing tenant deletion leaves earlier deletions in place.
    pub async fn delete_project(&self, ctx: &RequestContext, id: &str) -> ManagerResult<bool> {
        cancellable(ctx, async {
            if self.store.get_project(id).await?.is_none() {
                debug!("Delete skipped, project {} not found", id);
                return Ok(false);
            }

            self.store.delete_project(id).await?;

            let tenants = self.store.list_tenants_by_project(id).await?;
            for tenant in &tenants {
                let tenant_id = generate_tenant_id(
                    &tenant.related_project_id,
                    tenant.kind.as_str(),
                    &tenant.related_workspace,
                );
                self.store.delete_tenant(&tenant_id).await?;
            }

            info!("Deleted project {} and {} tenants", id, tenants.len());
            Ok::<_, ManagerError>(true)
        })
        .await
    }

    /// Monitor terminus keys followed by tenant ids not already listed as monitor keys
    pub async fn get_projects_tenant_ids(
        &self,
        ctx: &RequestContext,
        project_ids: &[String],
    ) -> ManagerResult<Vec<String>> {
        cancellable(ctx, async {
            let numeric_ids = project_ids
                .iter()
                .map(|id| {
                    id.parse::<i64>().map_err(|_| {
                        ManagerError::InvalidArgument(format!("invalid project id: {}", id))
                    })
                })
                .collect::<ManagerResult<Vec<i64>>>()?;

            let mut ids = Vec::new();
            for project_id in numeric_ids {
                ids.extend(self.monitors.list_monitor_keys(project_id).await?);
            }
            let monitor_keys: HashSet<String> = ids.iter().cloned().collect();

            for project_id in project_ids {
                let tenants = self.store.list_tenants_by_project(project_id).await?;
                ids.extend(
                    tenants
                        .into_iter()
                        .map(|tenant| tenant.id)
                        .filter(|tenant_id| !monitor_keys.contains(tenant_id)),
                );
            }

            debug!(
                "Collected {} tenant ids for {} projects",
                ids.len(),
                project_ids.len()
            );
            Ok::<_, ManagerError>(ids)
        })
        .await
    }

    /// Statistics straight from the provider; failures are surfaced
    pub async fn get_projects_statistics(
        &self,
        ctx: &RequestContext,
        project_ids: &[String],
    ) -> ManagerResult<HashMap<String, ProjectStatistics>> {
        cancellable(ctx, async {
            self.statistics
                .fetch_stats(ctx.org_id(), project_ids)
                .await
                .map_err(ManagerError::StatisticsUnavailable)
        })
        .await
    }

    /// Project and workspace counts over the reconciled list
    pub async fn get_project_overview(
        &self,
        ctx: &RequestContext,
        project_ids: &[String],
    ) -> ManagerResult<ProjectOverview> {
        let projects = self.get_project_list(ctx, project_ids, false).await?;

        Ok(ProjectOverview {
            project_count: projects.len() as i64,
            workspace_count: projects
                .iter()
                .map(|project| project.relationship.len() as i64)
                .sum(),
        })
    }

    async fn list_projects(
        &self,
        ctx: &RequestContext,
        project_ids: &[String],
        include_statistics: bool,
    ) -> ManagerResult<Vec<Project>> {
        let language = ctx.language();

        // An empty id list would mean "everything" to the orchestrator
        let legacy = async {
            if project_ids.is_empty() {
                return Ok(Vec::new());
            }
            self.gateway
                .fetch_by_ids(
                    ctx.org_id(),
                    ctx.user_id().unwrap_or_default(),
                    project_ids,
                )
                .await
                .map_err(ManagerError::from)
        };
        let native = try_join_all(project_ids.iter().map(|id| self.load_native(id, language)));

        let (legacy_records, native_projects) = tokio::try_join!(legacy, native)?;

        let mut merger = ProjectMerger::new();
        for record in &legacy_records {
            merger.push_legacy(convert_legacy_project(
                record,
                self.options.legacy_kind,
                &self.display,
                language,
            ));
        }
        for project in native_projects.into_iter().flatten() {
            merger.push_native(project);
        }

        let mut projects = merger.into_projects();
        debug!(
            "Reconciled {} projects from {} legacy records and {} requested ids",
            projects.len(),
            legacy_records.len(),
            project_ids.len()
        );

        if include_statistics && !projects.is_empty() {
            self.attach_statistics(ctx, &mut projects).await;
        }

        Ok(projects)
    }

    async fn attach_statistics(&self, ctx: &RequestContext, projects: &mut [Project]) {
        let ids: Vec<String> = projects.iter().map(|project| project.id.clone()).collect();

        match self.statistics.fetch_stats(ctx.org_id(), &ids).await {
            Ok(stats) => {
                for project in projects.iter_mut() {
                    if let Some(project_stats) = stats.get(&project.id) {
                        project.apply_statistics(project_stats);
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Failed to fetch statistics for {} projects, continuing without: {}",
                    ids.len(),
                    e
                );
            }
        }
    }

    async fn load_native(
        &self,
        id: &str,
        language: Option<&str>,
    ) -> ManagerResult<Option<Project>> {
        let Some(record) = self.store.get_project(id).await? else {
            return Ok(None);
        };
        let tenants = self.store.list_tenants_by_project(id).await?;
        Ok(Some(self.project_from_record(record, &tenants, language)))
    }

    async fn authorize_project_read(
        &self,
        ctx: &RequestContext,
        project_id: u64,
    ) -> ManagerResult<()> {
        if ctx.is_internal_client() {
            return Ok(());
        }
        let user_id = ctx.user_id().ok_or(ManagerError::NotAuthenticated)?;

        let check = PermissionCheck::project_get(user_id, project_id);
        match self.permissions.check(&check).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ManagerError::PermissionDenied(format!(
                "user {} may not read project {}",
                user_id, project_id
            ))),
            Err(e) => {
                warn!(
                    "Permission check failed for user {} on project {}: {}",
                    user_id, project_id, e
                );
                Err(ManagerError::PermissionDenied(format!(
                    "permission check failed for project {}",
                    project_id
                )))
            }
        }
    }

    fn project_from_record(
        &self,
        record: ProjectRecord,
        tenants: &[TenantRecord],
        language: Option<&str>,
    ) -> Project {
        let relationship = self
            .options
            .workspace_order
            .iter()
            .filter_map(|workspace| {
                tenants
                    .iter()
                    .find(|tenant| tenant.related_workspace == workspace.as_str())
                    .map(|tenant| TenantRelationship {
                        workspace: tenant.related_workspace.clone(),
                        display_workspace: self
                            .display
                            .workspace(language, &tenant.related_workspace),
                        tenant_id: tenant.id.clone(),
                    })
            })
            .collect();

        Project {
            display_kind: self.display.kind(language, record.kind.as_str()),
            id: record.id,
            name: record.name,
            display_name: record.display_name,
            description: String::new(),
            logo_url: String::new(),
            kind: record.kind,
            create_time: unix_nanos(record.created_at),
            update_time: unix_nanos(record.updated_at),
            is_deleted: record.is_deleted,
            service_count: 0,
            last_active_time: 0,
            last24h_alert_count: 0,
            relationship,
        }
    }
}

fn parse_project_id(id: &str) -> ManagerResult<u64> {
    id.parse::<u64>()
        .map_err(|_| ManagerError::InvalidArgument(format!("invalid project id: {}", id)))
}

async fn cancellable<T, F>(ctx: &RequestContext, operation: F) -> ManagerResult<T>
where
    F: Future<Output = ManagerResult<T>>,
{
    tokio::select! {
        biased;
        _ = ctx.cancellation().cancelled() => Err(ManagerError::Cancelled),
        result = operation => result,
    }
}
