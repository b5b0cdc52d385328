// ABOUTME: Conversion of legacy orchestrator records and native/legacy deduplication
// ABOUTME: Native projects replace legacy ones in place, inheriting description and logo

use std::collections::HashMap;
use trellis_core::{unix_nanos, Project, ProjectKind, TenantRelationship};

use crate::gateway::LegacyProjectRecord;
use crate::localizer::DisplayText;

/// Convert an orchestrator record into the unified view.
///
/// `envs` and `tenant_groups` are walked pairwise; an empty environment
/// drops its paired tenant id, and environments without a paired tenant id
/// are skipped as well.
pub fn convert_legacy_project(
    record: &LegacyProjectRecord,
    kind: ProjectKind,
    display: &DisplayText,
    language: Option<&str>,
) -> Project {
    let relationship = record
        .envs
        .iter()
        .zip(record.tenant_groups.iter())
        .filter(|(env, _)| !env.is_empty())
        .map(|(env, tenant_id)| TenantRelationship {
            workspace: env.clone(),
            display_workspace: display.workspace(language, env),
            tenant_id: tenant_id.clone(),
        })
        .collect();

    let create_time = unix_nanos(record.create_time);

    Project {
        id: record.project_id.clone(),
        name: record.project_name.clone(),
        display_name: record.project_name.clone(),
        description: record.project_desc.clone(),
        logo_url: record.logo_url.clone(),
        kind,
        display_kind: display.kind(language, kind.as_str()),
        create_time,
        update_time: create_time,
        is_deleted: false,
        service_count: 0,
        last_active_time: 0,
        last24h_alert_count: 0,
        relationship,
    }
}

/// Merge a native project over the entry it collides with.
///
/// Native values win; empty native description or logo fall back to the
/// replaced entry's values. Never the reverse.
pub fn merge_native(mut native: Project, existing: &Project) -> Project {
    if native.description.is_empty() {
        native.description = existing.description.clone();
    }
    if native.logo_url.is_empty() {
        native.logo_url = existing.logo_url.clone();
    }
    native
}

/// Ordered, id-deduplicated project list under construction
#[derive(Debug, Default)]
pub struct ProjectMerger {
    projects: Vec<Project>,
    index: HashMap<String, usize>,
}

impl ProjectMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a legacy project; a repeated id keeps the first occurrence
    pub fn push_legacy(&mut self, project: Project) {
        if !project.has_relationships() || self.index.contains_key(&project.id) {
            return;
        }
        self.index.insert(project.id.clone(), self.projects.len());
        self.projects.push(project);
    }

    /// Insert a native project, replacing a colliding entry at its position
    pub fn push_native(&mut self, project: Project) {
        if !project.has_relationships() {
            return;
        }
        match self.index.get(&project.id) {
            Some(&pos) => {
                let merged = merge_native(project, &self.projects[pos]);
                self.projects[pos] = merged;
            }
            None => {
                self.index.insert(project.id.clone(), self.projects.len());
                self.projects.push(project);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn into_projects(self) -> Vec<Project> {
        self.projects
    }
}
