// ABOUTME: Data layer for native projects, their tenants, and legacy monitors
// ABOUTME: Storage traits consumed by the project service plus the SQLite implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub mod sqlite;
pub mod types;

pub use sqlite::SqliteProjectStore;
pub use types::{ProjectRecord, TenantRecord};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Duplicate record id: {0}")]
    Duplicate(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub enable_wal: bool,
    pub max_connections: u32,
    pub busy_timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: trellis_core::constants::database_file(),
            enable_wal: true,
            max_connections: 10,
            busy_timeout_seconds: 30,
        }
    }
}

impl StorageConfig {
    /// Single-connection in-memory database, mainly for tests
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            enable_wal: false,
            max_connections: 1,
            busy_timeout_seconds: 10,
        }
    }
}

/// Native project and tenant rows keyed by project id.
///
/// Deleted rows are invisible to every read.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get_project(&self, id: &str) -> StorageResult<Option<ProjectRecord>>;
    async fn create_project(&self, project: ProjectRecord) -> StorageResult<ProjectRecord>;
    async fn update_project(&self, project: ProjectRecord) -> StorageResult<ProjectRecord>;
    async fn delete_project(&self, id: &str) -> StorageResult<()>;

    async fn create_tenant(&self, tenant: TenantRecord) -> StorageResult<TenantRecord>;
    async fn list_tenants_by_project(&self, project_id: &str) -> StorageResult<Vec<TenantRecord>>;
    async fn delete_tenant(&self, tenant_id: &str) -> StorageResult<()>;
}

/// Terminus keys of monitors registered before projects owned their tenants
#[async_trait]
pub trait MonitorStore: Send + Sync {
    async fn list_monitor_keys(&self, project_id: i64) -> StorageResult<Vec<String>>;
}
