//! Common test utilities for compiler tests

#![allow(dead_code)]

use docfilter_compiler::CompiledCondition;
use docfilter_core::{ExecutionOptions, FilterDefinition};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// `CompanyFilter`: one level below `AuthorFilter`
pub fn company_definition() -> Arc<FilterDefinition> {
    Arc::new(
        FilterDefinition::builder("CompanyFilter")
            .field("country")
            .field("size__gt")
            .build()
            .unwrap(),
    )
}

/// `AuthorFilter`: nested under `PostFilter.author`
pub fn author_definition() -> Arc<FilterDefinition> {
    Arc::new(
        FilterDefinition::builder("AuthorFilter")
            .field("name")
            .field("count__gte")
            .nested("company", company_definition())
            .search("search", ["name", "bio"])
            .build()
            .unwrap(),
    )
}

/// `PostFilter`: top-level filter
pub fn post_definition() -> Arc<FilterDefinition> {
    post_definition_with(author_definition())
}

pub fn post_definition_with(author: Arc<FilterDefinition>) -> Arc<FilterDefinition> {
    Arc::new(
        FilterDefinition::builder("PostFilter")
            .field("title")
            .nested("author", author)
            .field("views__lt")
            .field("tags__in")
            .field("deleted_at__isnull")
            .search("search", ["title", "body"])
            .build()
            .unwrap(),
    )
}

/// Compiled conditions as `(document, options)` pairs for easy comparison
pub fn pairs(conditions: &[CompiledCondition]) -> Vec<(JsonValue, ExecutionOptions)> {
    conditions
        .iter()
        .map(|c| (c.predicate.to_document(), c.options))
        .collect()
}
