//! docfilter Compiler - filter fields to document query conditions
//!
//! This crate compiles a filter instance into an ordered list of store-level
//! predicates, each paired with the execution options the query executor
//! needs (link fetching, nesting depth).

pub mod codegen;
pub mod compiler;
pub mod error;

// Re-export main types
pub use compiler::{CompiledCondition, CompilerOptions, ConditionCompiler};
pub use error::{CompileError, Result};

// Re-export codegen entry points
pub use codegen::{compile_search, transform};
