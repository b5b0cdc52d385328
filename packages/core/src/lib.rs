// ABOUTME: Core types, enums, and utilities for Trellis
// ABOUTME: Foundational package shared by storage, config, and the project service

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    Project, ProjectCreateInput, ProjectKind, ProjectOverview, ProjectStatistics,
    ProjectUpdateInput, TenantRelationship, Workspace,
};

// Re-export constants
pub use constants::{trellis_dir, ACTIVITY_BUCKET_MS, DEFAULT_WORKSPACE_ORDER};

// Re-export utilities
pub use utils::{generate_tenant_id, unix_nanos};

// Re-export validation
pub use validation::{validate_project_create, ValidationError};
