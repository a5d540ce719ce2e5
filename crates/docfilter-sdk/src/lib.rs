//! docfilter SDK
//!
//! High-level API: load filter definitions, bind request parameters and
//! assemble the document query handed to the executor.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod query;

// Re-export main types
pub use builder::FilterEngineBuilder;
pub use config::EngineConfig;
pub use engine::FilterEngine;
pub use error::{Result, SdkError};
pub use query::FindQuery;

// Re-export commonly used types from dependencies
pub use docfilter_compiler::{CompiledCondition, CompilerOptions};
pub use docfilter_core::{ExecutionOptions, Filter, FilterDefinition, FilterValue, Predicate, SortKey};
