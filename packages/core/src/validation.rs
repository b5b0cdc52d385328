// ABOUTME: Input validation for project creation
// ABOUTME: Required-field and kind checks run before anything is persisted

use thiserror::Error;

use crate::types::{ProjectCreateInput, ProjectKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid project kind: {0}. Must be one of: DOP, MSP")]
    InvalidKind(String),
}

/// Validate a create request and return the parsed kind
pub fn validate_project_create(input: &ProjectCreateInput) -> Result<ProjectKind, ValidationError> {
    let missing: Vec<&str> = [
        ("id", input.id.as_str()),
        ("name", input.name.as_str()),
        ("kind", input.kind.as_str()),
        ("displayName", input.display_name.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingParameter(missing.join(",")));
    }

    input
        .kind
        .parse::<ProjectKind>()
        .map_err(|_| ValidationError::InvalidKind(input.kind.clone()))
}
