// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Trellis

// Storage
pub const TRELLIS_DATABASE_PATH: &str = "TRELLIS_DATABASE_PATH";
pub const TRELLIS_DB_MAX_CONNECTIONS: &str = "TRELLIS_DB_MAX_CONNECTIONS";

// Upstream services
pub const TRELLIS_LEGACY_GATEWAY_URL: &str = "TRELLIS_LEGACY_GATEWAY_URL";
pub const TRELLIS_STATISTICS_URL: &str = "TRELLIS_STATISTICS_URL";
pub const TRELLIS_PERMISSION_URL: &str = "TRELLIS_PERMISSION_URL";
pub const TRELLIS_HTTP_TIMEOUT_SECS: &str = "TRELLIS_HTTP_TIMEOUT_SECS";

// Localization
pub const TRELLIS_FALLBACK_LANGUAGE: &str = "TRELLIS_FALLBACK_LANGUAGE";

// Logging
pub const TRELLIS_LOG: &str = "TRELLIS_LOG";

// Defaults
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_LEGACY_GATEWAY_URL: &str = "http://localhost:9529";
pub const DEFAULT_STATISTICS_URL: &str = "http://localhost:7096";
pub const DEFAULT_PERMISSION_URL: &str = "http://localhost:9529";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en";
pub const DEFAULT_LOG_FILTER: &str = "info";
