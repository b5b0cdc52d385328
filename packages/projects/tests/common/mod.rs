// ABOUTME: Common test utilities for integration tests
// ABOUTME: Wires a manager to an in-memory SQLite store and a wiremock upstream server

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use trellis_projects::{
    CatalogLocalizer, Collaborators, HttpLegacyGateway, HttpPermissionChecker,
    HttpStatisticsProvider, ManagerOptions, ProjectsManager, RequestContext, SqliteProjectStore,
    StorageConfig,
};
use wiremock::MockServer;

/// Test context holding the upstream server, the store and the manager under test
pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<SqliteProjectStore>,
    pub manager: ProjectsManager,
}

/// Manager backed by a fresh in-memory database; every remote collaborator
/// points at the same mock server
pub async fn setup() -> TestContext {
    let server = MockServer::start().await;
    let store = Arc::new(
        SqliteProjectStore::new(&StorageConfig::in_memory())
            .await
            .expect("Failed to open in-memory store"),
    );
    let timeout = Duration::from_secs(5);

    let collaborators = Collaborators {
        store: store.clone(),
        monitors: store.clone(),
        gateway: Arc::new(HttpLegacyGateway::new(server.uri(), timeout).unwrap()),
        statistics: Arc::new(HttpStatisticsProvider::new(server.uri(), timeout).unwrap()),
        permissions: Arc::new(HttpPermissionChecker::new(server.uri(), timeout).unwrap()),
        localizer: Arc::new(CatalogLocalizer::with_builtin("en")),
    };

    TestContext {
        server,
        store,
        manager: ProjectsManager::new(collaborators, ManagerOptions::default()),
    }
}

pub fn caller() -> RequestContext {
    RequestContext::new().with_user("u-1").with_org("org-1")
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Successful envelope around `data`
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// Failed envelope with the given error code and message
pub fn error_envelope(code: &str, msg: &str) -> Value {
    json!({ "success": false, "err": { "code": code, "msg": msg } })
}

pub fn legacy_json(id: &str, envs: &[&str], tenant_groups: &[&str]) -> Value {
    json!({
        "projectId": id,
        "projectName": format!("legacy-{}", id),
        "projectDesc": format!("legacy description of {}", id),
        "logoUrl": format!("https://cdn.example.com/{}.png", id),
        "createTime": "2024-01-01T00:00:00Z",
        "envs": envs,
        "tenantGroups": tenant_groups,
    })
}
