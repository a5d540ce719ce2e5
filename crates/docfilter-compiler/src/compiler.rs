//! Condition compiler
//!
//! Walks the set fields of a filter in declaration order and produces the
//! ordered list of predicates with their execution options. Each field is
//! classified once:
//!
//! 1. sub-filter value: guard predicate plus the re-rooted sub-filter conditions
//! 2. operator-suffixed field: one operator expression on the dotted path
//! 3. reserved search field: one `$or` over the search fields
//! 4. anything else: plain equality

use crate::codegen::{compile_search, transform};
use crate::error::{CompileError, Result};
use docfilter_core::{
    ExecutionOptions, Expression, Filter, FilterValue, Operator, Predicate,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Default limit on sub-filter recursion
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 16;

/// Compiler options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Deepest sub-filter level that may be compiled
    pub max_nesting_depth: u32,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// A compiled predicate with its execution options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledCondition {
    pub predicate: Predicate,
    pub options: ExecutionOptions,
}

impl CompiledCondition {
    pub fn new(predicate: Predicate, options: ExecutionOptions) -> Self {
        Self { predicate, options }
    }

    /// Condition with no execution hints
    pub fn plain(predicate: Predicate) -> Self {
        Self::new(predicate, ExecutionOptions::default())
    }

    pub fn into_pair(self) -> (Predicate, ExecutionOptions) {
        (self.predicate, self.options)
    }
}

/// Filter condition compiler
///
/// Stateless apart from its options; one compiler can serve any number of
/// filters from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ConditionCompiler {
    options: CompilerOptions,
}

impl ConditionCompiler {
    /// Create a compiler with default options
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    /// Create a compiler with custom options
    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile every set field of `filter`, starting at nesting depth 1
    pub fn get(&self, filter: &Filter) -> Result<Vec<CompiledCondition>> {
        self.compile(filter, 1)
    }

    /// Compile every set field of `filter` at `nesting_depth`
    ///
    /// Either every condition is returned or an error is; there is no
    /// partial result.
    pub fn compile(&self, filter: &Filter, nesting_depth: u32) -> Result<Vec<CompiledCondition>> {
        if nesting_depth == 0 {
            return Err(CompileError::InvalidNestingDepth(nesting_depth));
        }
        if nesting_depth > self.options.max_nesting_depth {
            return Err(CompileError::NestingTooDeep {
                depth: nesting_depth,
                max: self.options.max_nesting_depth,
            });
        }

        let definition = filter.definition();
        let mut conditions = Vec::new();

        for (declared, value) in filter.filtering_fields() {
            let name = declared.name();

            match value {
                FilterValue::SubFilter(sub) => {
                    log::debug!(
                        "{}: nested filter '{}' at depth {}",
                        definition.name(),
                        name,
                        nesting_depth
                    );
                    conditions.extend(self.handle_nested(name, sub, nesting_depth)?);
                }
                _ => {
                    if let Some(operator) = declared.field.operator {
                        log::debug!("{}: operator field '{}'", definition.name(), name);
                        if let Some(condition) =
                            compile_operator_field(&declared.field.path, operator, value)
                        {
                            conditions.push(condition);
                        }
                    } else if definition.is_search_field(name) {
                        log::debug!("{}: search field '{}'", definition.name(), name);
                        conditions.push(CompiledCondition::plain(compile_search(
                            definition.search_model_fields(),
                            value,
                        )));
                    } else {
                        log::debug!("{}: plain field '{}'", definition.name(), name);
                        conditions.push(CompiledCondition::plain(Predicate::equals(
                            name,
                            value.to_json(),
                        )));
                    }
                }
            }
        }

        for condition in &conditions {
            log::trace!(
                "{} depth {}: {} {:?}",
                definition.name(),
                nesting_depth,
                condition.predicate.to_document(),
                condition.options
            );
        }

        Ok(conditions)
    }

    /// Compile a sub-filter set on the linked-document field `field_name`
    ///
    /// An empty sub-filter yields nothing. Otherwise a guard predicate
    /// `{field_name: {"$ne": null}}` comes first, followed by the
    /// sub-filter's own conditions re-rooted under `field_name`.
    pub fn handle_nested(
        &self,
        field_name: &str,
        sub_filter: &Filter,
        nesting_depth: u32,
    ) -> Result<Vec<CompiledCondition>> {
        if sub_filter.is_empty() {
            log::debug!("Skipping empty nested filter '{}'", field_name);
            return Ok(Vec::new());
        }

        let outer = ExecutionOptions::linked(nesting_depth);
        let guard = Predicate::expression(field_name, Expression::Ne(JsonValue::Null));

        let inner = self.compile(sub_filter, nesting_depth + 1)?;

        let mut conditions = Vec::with_capacity(inner.len() + 1);
        conditions.push(CompiledCondition::new(guard, outer));
        conditions.extend(inner.into_iter().map(|condition| {
            CompiledCondition::new(
                condition.predicate.prefixed(field_name),
                ExecutionOptions::merge(outer, condition.options),
            )
        }));

        Ok(conditions)
    }
}

/// Compile `{path: transform(operator, value)}`, `None` when the transform
/// applies no constraint
fn compile_operator_field(
    path: &str,
    operator: Operator,
    value: &FilterValue,
) -> Option<CompiledCondition> {
    transform(operator, value)
        .map(|expression| CompiledCondition::plain(Predicate::expression(path, expression)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfilter_core::FilterDefinition;
    use serde_json::json;
    use std::sync::Arc;

    fn documents(conditions: &[CompiledCondition]) -> Vec<JsonValue> {
        conditions.iter().map(|c| c.predicate.to_document()).collect()
    }

    #[test]
    fn test_compile_operator_fields_in_order() {
        let def = Arc::new(
            FilterDefinition::builder("F")
                .field("count__lte")
                .field("name__nin")
                .build()
                .unwrap(),
        );
        let filter = Filter::new(def)
            .with("count__lte", 5)
            .unwrap()
            .with("name__nin", vec!["a", "b"])
            .unwrap();

        let conditions = ConditionCompiler::new().get(&filter).unwrap();
        assert_eq!(
            documents(&conditions),
            vec![json!({"count": {"$lte": 5}}), json!({"name": {"$nin": ["a", "b"]}})]
        );
        assert!(conditions.iter().all(|c| c.options == ExecutionOptions::default()));
    }

    #[test]
    fn test_compile_plain_field() {
        let def = Arc::new(FilterDefinition::builder("F").field("name").build().unwrap());
        let filter = Filter::new(def).with("name", "alice").unwrap();

        let conditions = ConditionCompiler::new().get(&filter).unwrap();
        assert_eq!(documents(&conditions), vec![json!({"name": "alice"})]);
    }

    #[test]
    fn test_compile_empty_filter() {
        let def = Arc::new(FilterDefinition::builder("F").field("name").build().unwrap());
        let conditions = ConditionCompiler::new().get(&Filter::new(def)).unwrap();
        assert!(conditions.is_empty());
    }

    #[test]
    fn test_depth_zero_is_rejected() {
        let def = Arc::new(FilterDefinition::builder("F").field("name").build().unwrap());
        let err = ConditionCompiler::new().compile(&Filter::new(def), 0).unwrap_err();
        assert_eq!(err, CompileError::InvalidNestingDepth(0));
    }

    #[test]
    fn test_max_depth_is_enforced() {
        let inner = Arc::new(FilterDefinition::builder("Inner").field("x").build().unwrap());
        let outer = Arc::new(
            FilterDefinition::builder("Outer")
                .nested("inner", inner.clone())
                .build()
                .unwrap(),
        );
        let filter = Filter::new(outer)
            .with("inner", Filter::new(inner).with("x", 1).unwrap())
            .unwrap();

        let compiler = ConditionCompiler::with_options(CompilerOptions {
            max_nesting_depth: 1,
        });
        let err = compiler.get(&filter).unwrap_err();
        assert_eq!(err, CompileError::NestingTooDeep { depth: 2, max: 1 });
    }

    #[test]
    fn test_compiled_condition_into_pair() {
        let condition = CompiledCondition::plain(Predicate::equals("a", json!(1)));
        let (predicate, options) = condition.into_pair();
        assert_eq!(predicate.to_document(), json!({"a": 1}));
        assert_eq!(options, ExecutionOptions::default());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: CompilerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompilerOptions::default());
    }
}
