//! Find query assembly
//!
//! A `FindQuery` bundles everything the executor needs for one find call:
//! the compiled conditions (conjoined in order), link-fetching hints, and
//! the sort keys.

use docfilter_compiler::CompiledCondition;
use docfilter_core::{SortKey, SortableQuery};
use serde_json::{json, Map, Value as JsonValue};

/// Assembled document query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    conditions: Vec<CompiledCondition>,
    sort: Vec<SortKey>,
    limit: Option<u64>,
    skip: Option<u64>,
}

impl FindQuery {
    pub fn new(conditions: Vec<CompiledCondition>) -> Self {
        Self {
            conditions,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn conditions(&self) -> &[CompiledCondition] {
        &self.conditions
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    /// Returns true if any condition needs linked documents resolved
    pub fn fetch_links(&self) -> bool {
        self.conditions.iter().any(|c| c.options.fetch_links)
    }

    /// Deepest nesting level any condition requires
    pub fn nesting_depth(&self) -> Option<u32> {
        self.conditions
            .iter()
            .filter_map(|c| c.options.nesting_depth)
            .max()
    }

    /// Conjunction of all predicates, in order
    pub fn filter_document(&self) -> JsonValue {
        match self.conditions.as_slice() {
            [] => JsonValue::Object(Map::new()),
            [single] => single.predicate.to_document(),
            many => {
                let docs: Vec<JsonValue> = many.iter().map(|c| c.predicate.to_document()).collect();
                json!({ "$and": docs })
            }
        }
    }

    /// Sort keys as ordered `[field, 1 | -1]` pairs
    pub fn sort_document(&self) -> JsonValue {
        JsonValue::Array(
            self.sort
                .iter()
                .map(|key| json!([key.field, key.direction.as_i32()]))
                .collect(),
        )
    }

    /// Full query description
    pub fn to_document(&self) -> JsonValue {
        let mut doc = Map::new();
        doc.insert("filter".to_string(), self.filter_document());
        if !self.sort.is_empty() {
            doc.insert("sort".to_string(), self.sort_document());
        }
        if let Some(limit) = self.limit {
            doc.insert("limit".to_string(), json!(limit));
        }
        if let Some(skip) = self.skip {
            doc.insert("skip".to_string(), json!(skip));
        }
        doc.insert("fetch_links".to_string(), json!(self.fetch_links()));
        if let Some(depth) = self.nesting_depth() {
            doc.insert("nesting_depth".to_string(), json!(depth));
        }
        JsonValue::Object(doc)
    }
}

impl SortableQuery for FindQuery {
    fn sort_by(mut self, keys: &[SortKey]) -> Self {
        self.sort.extend_from_slice(keys);
        self
    }
}
