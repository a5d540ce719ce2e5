//! Compiler error types

use thiserror::Error;

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Sub-filter recursion went deeper than allowed
    #[error("Nesting depth {depth} exceeds the maximum of {max}")]
    NestingTooDeep { depth: u32, max: u32 },

    /// Nesting depth starts at 1
    #[error("Invalid nesting depth: {0}")]
    InvalidNestingDepth(u32),
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
