//! Error types for the designer core.

use thiserror::Error;

/// Errors raised for genuinely invalid canvas states.
///
/// Stale ids in update/delete/lookup calls are not errors; those operations
/// silently ignore what they cannot find.
#[derive(Debug, Error)]
pub enum DesignerError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Element is not a group: {0}")]
    NotAGroup(String),
    #[error("Assigning parent {parent} to {child} would create a cycle")]
    CyclicParent { child: String, parent: String },
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),
    #[error("Group {group} references missing child {child}")]
    DanglingChild { group: String, child: String },
    #[error("Group {group} and child {child} disagree on parentage")]
    MismatchedParent { group: String, child: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Document has no pages")]
    EmptyDocument,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for DesignerError {
    fn from(err: serde_json::Error) -> Self {
        DesignerError::Serialization(err.to_string())
    }
}

/// Result type for designer operations.
pub type DesignerResult<T> = Result<T, DesignerError>;
