//! docfilter Core - Core types for declarative document-store filters
//!
//! This crate provides the fundamental types used across the docfilter ecosystem:
//! - Operators and operator-suffixed field names
//! - Predicates and per-predicate execution options
//! - Filter definitions and filter instances with their set values
//! - Sort keys and the sort pass-through
//! - Error types

pub mod ast;
pub mod error;
pub mod filter;
pub mod sort;
pub mod types;

// Re-export commonly used types
pub use ast::{Condition, ExecutionOptions, Expression, FilterField, Operator, Predicate};
pub use error::CoreError;
pub use filter::Filter;
pub use sort::{SortDirection, SortKey, SortableQuery};
pub use types::{FieldKind, FilterConstants, FilterDefinition, FilterDefinitionBuilder, FilterValue};
