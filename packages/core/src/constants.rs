use std::env;
use std::path::PathBuf;

use crate::types::Workspace;

/// Width of one recency bucket used when ordering projects by activity (10 minutes)
pub const ACTIVITY_BUCKET_MS: i64 = 10 * 60 * 1000;

/// Order in which native tenant relationships are emitted
pub const DEFAULT_WORKSPACE_ORDER: [Workspace; 5] = [
    Workspace::Dev,
    Workspace::Test,
    Workspace::Staging,
    Workspace::Prod,
    Workspace::Default,
];

/// Get the path to the Trellis directory (~/.trellis)
pub fn trellis_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".trellis")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".trellis")
    }
}

/// Get the path to the default database file (~/.trellis/trellis.db)
pub fn database_file() -> PathBuf {
    trellis_dir().join("trellis.db")
}
