//! Parser error types

use docfilter_core::CoreError;
use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Unknown field
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Nested field refers to a definition that does not exist
    #[error("Unknown filter reference '{reference}' in '{filter}'")]
    UnknownReference { filter: String, reference: String },

    /// Nested references form a cycle
    #[error("Circular filter reference: {0}")]
    CircularReference(String),

    /// Ordering values rejected
    #[error("Invalid ordering for '{field}': {message}")]
    InvalidOrdering { field: String, message: String },

    /// Definition rejected by the core
    #[error("Invalid definition: {0}")]
    Definition(#[from] CoreError),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_conversion() {
        let core = CoreError::DuplicateField("name".to_string());
        let error: ParseError = core.into();
        assert!(error.to_string().contains("Duplicate field: name"));
    }

    #[test]
    fn test_invalid_ordering_message() {
        let error = ParseError::InvalidOrdering {
            field: "order_by".to_string(),
            message: "age is not a valid ordering field".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid ordering for 'order_by': age is not a valid ordering field"
        );
    }
}
