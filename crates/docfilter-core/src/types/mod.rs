//! Type system for docfilter
//!
//! This module contains:
//! - Filter values handed over by the model layer
//! - Filter definitions and their field kinds

pub mod schema;
pub mod value;

pub use schema::{
    DeclaredField, FieldKind, FilterConstants, FilterDefinition, FilterDefinitionBuilder,
    DEFAULT_ORDERING_FIELD,
};
pub use value::FilterValue;
