//! Code generation module
//!
//! Per-operator value transforms and the search fan-out.

pub mod operator_codegen;
pub mod search_codegen;

pub use operator_codegen::{contains, transform};
pub use search_codegen::compile_search;
