//! Filter engine
//!
//! Holds the registered definitions and turns request parameters into
//! compiled conditions and find queries.

use crate::error::{Result, SdkError};
use crate::query::FindQuery;
use docfilter_compiler::{CompiledCondition, ConditionCompiler};
use docfilter_core::{Filter, FilterDefinition};
use docfilter_parser::{DefinitionRegistry, ParamsParser};
use std::sync::Arc;

/// Registry of filter definitions plus the compiler that serves them
#[derive(Debug, Clone)]
pub struct FilterEngine {
    registry: DefinitionRegistry,
    compiler: ConditionCompiler,
    params: ParamsParser,
}

impl FilterEngine {
    pub(crate) fn new(
        registry: DefinitionRegistry,
        compiler: ConditionCompiler,
        params: ParamsParser,
    ) -> Self {
        Self {
            registry,
            compiler,
            params,
        }
    }

    /// Registered definition names, in registration order
    pub fn filter_names(&self) -> &[String] {
        self.registry.names()
    }

    pub fn definition(&self, name: &str) -> Result<&Arc<FilterDefinition>> {
        self.registry
            .get(name)
            .ok_or_else(|| SdkError::UnknownFilter(name.to_string()))
    }

    /// A filter with no values set
    pub fn new_filter(&self, name: &str) -> Result<Filter> {
        Ok(Filter::new(self.definition(name)?.clone()))
    }

    /// Bind raw request parameters to a filter
    pub fn bind<I, K, V>(&self, name: &str, params: I) -> Result<Filter>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let definition = self.definition(name)?;
        Ok(self.params.parse(definition, params)?)
    }

    /// Compile a filter into ordered conditions
    pub fn conditions(&self, filter: &Filter) -> Result<Vec<CompiledCondition>> {
        let conditions = self.compiler.get(filter)?;
        tracing::debug!(
            filter = %filter.definition().name(),
            conditions = conditions.len(),
            "Compiled filter conditions"
        );
        Ok(conditions)
    }

    /// Compile a filter and apply its ordering
    pub fn find_query(&self, filter: &Filter) -> Result<FindQuery> {
        let query = FindQuery::new(self.conditions(filter)?);
        Ok(filter.sort(query))
    }

    /// Bind, compile and sort in one step
    pub fn query<I, K, V>(&self, name: &str, params: I) -> Result<FindQuery>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let filter = self.bind(name, params)?;
        self.find_query(&filter)
    }
}
