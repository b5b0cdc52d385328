use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row};
use tracing::{debug, info};
use trellis_core::ProjectKind;

use super::{
    MonitorStore, ProjectRecord, ProjectStore, StorageConfig, StorageError, StorageResult,
    TenantRecord,
};

/// SQLite implementation of [`ProjectStore`] and [`MonitorStore`]
pub struct SqliteProjectStore {
    pool: SqlitePool,
}

impl SqliteProjectStore {
    /// Open (creating if needed) the database described by `config` and run migrations
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        let database_url = format!("sqlite:{}", config.path.display());

        if !sqlx::Sqlite::database_exists(&database_url)
            .await
            .map_err(StorageError::Sqlx)?
        {
            debug!("Creating database at: {}", database_url);
            sqlx::Sqlite::create_database(&database_url)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.busy_timeout_seconds))
            .connect(&database_url)
            .await
            .map_err(StorageError::Sqlx)?;

        if config.enable_wal {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;

        info!("Project storage migrations completed");
        Ok(())
    }

    /// Register a legacy monitor for a project
    pub async fn register_monitor(
        &self,
        project_id: i64,
        terminus_key: &str,
        workspace: &str,
    ) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sp_monitor (project_id, terminus_key, workspace, created_at, is_delete)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(project_id)
        .bind(terminus_key)
        .bind(workspace)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    fn row_to_project(row: &SqliteRow) -> StorageResult<ProjectRecord> {
        let kind_str: String = row.try_get("type")?;
        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        Ok(ProjectRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            display_name: row.try_get("display_name")?,
            kind: parse_kind(&kind_str)?,
            created_at: parse_timestamp(&created_at_str, "created_at")?,
            updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
            is_deleted: row.try_get("is_deleted")?,
        })
    }

    fn row_to_tenant(row: &SqliteRow) -> StorageResult<TenantRecord> {
        let kind_str: String = row.try_get("type")?;
        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        Ok(TenantRecord {
            id: row.try_get("id")?,
            kind: parse_kind(&kind_str)?,
            related_project_id: row.try_get("related_project_id")?,
            related_workspace: row.try_get("related_workspace")?,
            created_at: parse_timestamp(&created_at_str, "created_at")?,
            updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
            is_deleted: row.try_get("is_deleted")?,
        })
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str, column: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| StorageError::Database(format!("Invalid {} timestamp", column)))
}

fn parse_kind(value: &str) -> StorageResult<ProjectKind> {
    value.parse::<ProjectKind>().map_err(StorageError::Database)
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn get_project(&self, id: &str) -> StorageResult<Option<ProjectRecord>> {
        let row = sqlx::query("SELECT * FROM msp_project WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => Ok(Some(Self::row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_project(&self, project: ProjectRecord) -> StorageResult<ProjectRecord> {
        // A soft-deleted row with the same id is revived; a live one is a duplicate
        let result = sqlx::query(
            r#"
            INSERT INTO msp_project (id, name, display_name, type, created_at, updated_at, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, 0)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                display_name = excluded.display_name,
                type = excluded.type,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                is_deleted = 0
            WHERE msp_project.is_deleted = 1
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.display_name)
        .bind(project.kind.as_str())
        .bind(format_timestamp(project.created_at))
        .bind(format_timestamp(project.updated_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Duplicate(project.id));
        }

        debug!("Created project '{}' with ID {}", project.name, project.id);
        self.get_project(&project.id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn update_project(&self, project: ProjectRecord) -> StorageResult<ProjectRecord> {
        let result = sqlx::query(
            r#"
            UPDATE msp_project
            SET name = ?, display_name = ?, updated_at = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(&project.name)
        .bind(&project.display_name)
        .bind(format_timestamp(project.updated_at))
        .bind(&project.id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_project(&project.id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn delete_project(&self, id: &str) -> StorageResult<()> {
        sqlx::query("UPDATE msp_project SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
            .bind(format_timestamp(Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        debug!("Soft-deleted project {}", id);
        Ok(())
    }

    async fn create_tenant(&self, tenant: TenantRecord) -> StorageResult<TenantRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO msp_tenant (id, type, related_project_id, related_workspace, created_at, updated_at, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, 0)
            ON CONFLICT(id) DO UPDATE SET
                type = excluded.type,
                related_project_id = excluded.related_project_id,
                related_workspace = excluded.related_workspace,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                is_deleted = 0
            WHERE msp_tenant.is_deleted = 1
            "#,
        )
        .bind(&tenant.id)
        .bind(tenant.kind.as_str())
        .bind(&tenant.related_project_id)
        .bind(&tenant.related_workspace)
        .bind(format_timestamp(tenant.created_at))
        .bind(format_timestamp(tenant.updated_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Duplicate(tenant.id));
        }

        let row = sqlx::query("SELECT * FROM msp_tenant WHERE id = ?")
            .bind(&tenant.id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        debug!(
            "Created tenant {} for project {} ({})",
            tenant.id, tenant.related_project_id, tenant.related_workspace
        );
        Self::row_to_tenant(&row)
    }

    async fn list_tenants_by_project(&self, project_id: &str) -> StorageResult<Vec<TenantRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM msp_tenant
            WHERE related_project_id = ? AND is_deleted = 0
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(Self::row_to_tenant).collect()
    }

    async fn delete_tenant(&self, tenant_id: &str) -> StorageResult<()> {
        sqlx::query("UPDATE msp_tenant SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
            .bind(format_timestamp(Utc::now()))
            .bind(tenant_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        debug!("Soft-deleted tenant {}", tenant_id);
        Ok(())
    }
}

#[async_trait]
impl MonitorStore for SqliteProjectStore {
    async fn list_monitor_keys(&self, project_id: i64) -> StorageResult<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT terminus_key FROM sp_monitor
            WHERE project_id = ? AND is_delete = 0
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("terminus_key").map_err(StorageError::Sqlx))
            .collect()
    }
}
