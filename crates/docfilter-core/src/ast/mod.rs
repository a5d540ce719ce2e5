//! Filter syntax: operators, field names and the predicates they compile to

pub mod field;
pub mod operator;
pub mod predicate;

pub use field::{FilterField, SUFFIX_DELIMITER};
pub use operator::{Operator, OPERATOR_TOKENS};
pub use predicate::{Condition, ExecutionOptions, Expression, Predicate};
