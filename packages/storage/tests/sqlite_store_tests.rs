// ABOUTME: Integration tests for the SQLite project store
// ABOUTME: Covers project/tenant CRUD, soft deletion, revival, and monitor keys

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trellis_core::ProjectKind;
use trellis_storage::{
    MonitorStore, ProjectRecord, ProjectStore, SqliteProjectStore, StorageConfig, StorageError,
    TenantRecord,
};

/// Helper to create a migrated in-memory store
async fn create_test_store() -> SqliteProjectStore {
    SqliteProjectStore::new(&StorageConfig::in_memory())
        .await
        .unwrap()
}

fn project(id: &str, kind: ProjectKind) -> ProjectRecord {
    let now = Utc::now();
    ProjectRecord {
        id: id.to_string(),
        name: format!("project-{}", id),
        display_name: format!("Project {}", id),
        kind,
        created_at: now,
        updated_at: now,
        is_deleted: false,
    }
}

fn tenant(id: &str, project_id: &str, workspace: &str) -> TenantRecord {
    let now = Utc::now();
    TenantRecord {
        id: id.to_string(),
        kind: ProjectKind::Msp,
        related_project_id: project_id.to_string(),
        related_workspace: workspace.to_string(),
        created_at: now,
        updated_at: now,
        is_deleted: false,
    }
}

#[tokio::test]
async fn test_create_and_get_project() {
    let store = create_test_store().await;

    let created = store.create_project(project("1", ProjectKind::Msp)).await.unwrap();
    assert_eq!(created.name, "project-1");
    assert!(!created.is_deleted);

    let fetched = store.get_project("1").await.unwrap().unwrap();
    assert_eq!(fetched, created);

    assert!(store.get_project("2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_foreign_key_enforcement_enabled() {
    let store = create_test_store().await;

    let foreign_keys_enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(store.pool())
        .await
        .unwrap();

    assert_eq!(foreign_keys_enabled, 1);
}

#[tokio::test]
async fn test_create_duplicate_project_fails() {
    let store = create_test_store().await;

    store.create_project(project("1", ProjectKind::Dop)).await.unwrap();
    let result = store.create_project(project("1", ProjectKind::Dop)).await;

    match result {
        Err(StorageError::Duplicate(id)) => assert_eq!(id, "1"),
        other => panic!("Expected Duplicate error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_project() {
    let store = create_test_store().await;
    let mut record = store.create_project(project("1", ProjectKind::Msp)).await.unwrap();

    record.name = "renamed".to_string();
    record.display_name = "Renamed".to_string();
    record.updated_at = record.updated_at + Duration::seconds(5);

    let updated = store.update_project(record.clone()).await.unwrap();
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.display_name, "Renamed");
    assert_eq!(updated.updated_at, record.updated_at);
    assert_eq!(updated.created_at, record.created_at);
}

#[tokio::test]
async fn test_update_missing_project_is_not_found() {
    let store = create_test_store().await;

    let result = store.update_project(project("9", ProjectKind::Msp)).await;
    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_delete_project_is_soft_and_revivable() {
    let store = create_test_store().await;
    store.create_project(project("1", ProjectKind::Msp)).await.unwrap();

    store.delete_project("1").await.unwrap();
    assert!(store.get_project("1").await.unwrap().is_none());

    let mut again = project("1", ProjectKind::Msp);
    again.name = "second-life".to_string();
    let revived = store.create_project(again).await.unwrap();
    assert_eq!(revived.name, "second-life");
    assert!(store.get_project("1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_tenant_lifecycle() {
    let store = create_test_store().await;

    store.create_tenant(tenant("t-dev", "1", "DEV")).await.unwrap();
    store.create_tenant(tenant("t-prod", "1", "PROD")).await.unwrap();
    store.create_tenant(tenant("t-other", "2", "DEV")).await.unwrap();

    let tenants = store.list_tenants_by_project("1").await.unwrap();
    let ids: Vec<&str> = tenants.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t-dev", "t-prod"]);

    store.delete_tenant("t-dev").await.unwrap();
    let tenants = store.list_tenants_by_project("1").await.unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0].related_workspace, "PROD");

    // Recreating a deleted tenant id revives it
    store.create_tenant(tenant("t-dev", "1", "DEV")).await.unwrap();
    assert_eq!(store.list_tenants_by_project("1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_live_tenant_fails() {
    let store = create_test_store().await;

    store.create_tenant(tenant("t", "1", "DEFAULT")).await.unwrap();
    let result = store.create_tenant(tenant("t", "1", "DEFAULT")).await;
    assert!(matches!(result, Err(StorageError::Duplicate(id)) if id == "t"));
}

#[tokio::test]
async fn test_monitor_keys() {
    let store = create_test_store().await;

    store.register_monitor(7, "key-a", "DEV").await.unwrap();
    store.register_monitor(7, "key-b", "PROD").await.unwrap();
    store.register_monitor(8, "key-c", "DEV").await.unwrap();

    assert_eq!(
        store.list_monitor_keys(7).await.unwrap(),
        vec!["key-a".to_string(), "key-b".to_string()]
    );
    assert!(store.list_monitor_keys(99).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_backed_store_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfig {
        path: temp_dir.path().join("nested").join("trellis.db"),
        enable_wal: true,
        max_connections: 2,
        busy_timeout_seconds: 5,
    };

    {
        let store = SqliteProjectStore::new(&config).await.unwrap();
        store.create_project(project("1", ProjectKind::Dop)).await.unwrap();
        store.pool().close().await;
    }

    let reopened = SqliteProjectStore::new(&config).await.unwrap();
    let fetched = reopened.get_project("1").await.unwrap().unwrap();
    assert_eq!(fetched.kind, ProjectKind::Dop);
}
