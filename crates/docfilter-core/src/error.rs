//! Error types for docfilter Core

use thiserror::Error;

/// Core error type
///
/// Definition errors are raised when a filter definition is built, so a
/// definition that exists is always well formed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown operator '{operator}' in field '{field}'")]
    UnknownOperator { field: String, operator: String },

    #[error("Invalid field name: '{0}'")]
    InvalidFieldName(String),

    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    #[error("Field name '{0}' is reserved for ordering")]
    ReservedFieldName(String),

    #[error("Unknown field '{field}' for filter '{filter}'")]
    UnknownField { filter: String, field: String },

    #[error("Field '{field}' expects {expected}")]
    ValueKindMismatch { field: String, expected: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
