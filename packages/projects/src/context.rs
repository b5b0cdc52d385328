// ABOUTME: Per-request caller context for project service operations
// ABOUTME: Carries identity, organization, language, internal-client flag and cancellation

use tokio_util::sync::CancellationToken;

/// Caller context supplied with every service call.
///
/// Empty strings are treated as absent values.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    user_id: String,
    org_id: String,
    language: Option<String>,
    internal_client: bool,
    cancel: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = org_id.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Mark the caller as a trusted in-cluster client that skips permission checks
    pub fn internal(mut self) -> Self {
        self.internal_client = true;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        Some(self.user_id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().filter(|lang| !lang.is_empty())
    }

    pub fn is_internal_client(&self) -> bool {
        self.internal_client
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}
