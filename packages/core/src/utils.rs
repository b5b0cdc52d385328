// ABOUTME: Shared utility functions for Trellis
// ABOUTME: Deterministic tenant id derivation and timestamp helpers

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Derive the tenant id for a project's environment.
///
/// The id is stable for a given (project, kind, workspace) triple so that
/// deletion can locate tenant rows without storing the id separately.
pub fn generate_tenant_id(project_id: &str, kind: &str, workspace: &str) -> String {
    let digest = Sha256::digest(format!("{}-{}-{}", project_id, kind, workspace).as_bytes());
    hex::encode(&digest[..16])
}

/// Nanoseconds since the Unix epoch, saturating outside the representable range
pub fn unix_nanos(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(i64::MAX)
}
