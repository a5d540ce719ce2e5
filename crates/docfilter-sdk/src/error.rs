//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] docfilter_parser::ParseError),

    /// Compiler error
    #[error("Compiler error: {0}")]
    CompileError(#[from] docfilter_compiler::CompileError),

    /// Filter definition or value error
    #[error("Filter error: {0}")]
    FilterError(#[from] docfilter_core::CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// No definition registered under this name
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
