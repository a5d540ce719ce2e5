//! Search fan-out
//!
//! One free-text search value becomes a disjunction of case-insensitive
//! substring matches, one per search field.

use super::operator_codegen::contains;
use docfilter_core::{FilterValue, Predicate};

/// Build the `$or` predicate over `fields`
pub fn compile_search(fields: &[String], value: &FilterValue) -> Predicate {
    let branches = fields
        .iter()
        .map(|field| Predicate::expression(field.as_str(), contains(value, true)))
        .collect();
    Predicate::any(branches)
}
