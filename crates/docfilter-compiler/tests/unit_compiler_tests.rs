//! Unit tests for the condition compiler
//!
//! Tests operator fields, search fan-out, nested sub-filters and the
//! execution options attached to each predicate.

mod common;

use common::{author_definition, company_definition, pairs, post_definition, post_definition_with};
use docfilter_compiler::*;
use docfilter_core::{ExecutionOptions, Filter, FilterDefinition};
use docfilter_parser::{DefinitionParser, ParamsParser};
use serde_json::json;
use std::sync::Arc;

fn plain() -> ExecutionOptions {
    ExecutionOptions::default()
}

// =============================================================================
// Operator and plain fields
// =============================================================================

#[test]
fn test_operator_fields_compile_in_declaration_order() -> anyhow::Result<()> {
    let def = Arc::new(
        FilterDefinition::builder("F")
            .field("count__lte")
            .field("name__nin")
            .build()?,
    );
    let filter = Filter::new(def)
        .with("name__nin", vec!["a", "b"])?
        .with("count__lte", 5)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![
            (json!({"count": {"$lte": 5}}), plain()),
            (json!({"name": {"$nin": ["a", "b"]}}), plain()),
        ]
    );
    Ok(())
}

#[test]
fn test_multi_segment_path() -> anyhow::Result<()> {
    let def = Arc::new(
        FilterDefinition::builder("F")
            .field("address__city__ilike")
            .build()?,
    );
    let filter = Filter::new(def).with("address__city__ilike", "ams")?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![(json!({"address.city": {"$regex": ".*ams.*", "$options": "i"}}), plain())]
    );
    Ok(())
}

#[test]
fn test_isnull_true_emits_nothing() -> anyhow::Result<()> {
    let filter = Filter::new(post_definition())
        .with("deleted_at__isnull", true)?
        .with("title", "rust")?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(pairs(&conditions), vec![(json!({"title": "rust"}), plain())]);
    Ok(())
}

#[test]
fn test_isnull_false_emits_not_null() -> anyhow::Result<()> {
    let filter = Filter::new(post_definition()).with("deleted_at__isnull", false)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![(json!({"deleted_at": {"$ne": null}}), plain())]
    );
    Ok(())
}

#[test]
fn test_comma_separated_values_reach_membership_predicate() -> anyhow::Result<()> {
    let def = DefinitionParser::parse(
        r#"
filter:
  name: F
  fields:
    - id__in
"#,
    )?;
    let filter = ParamsParser::new().parse(&Arc::new(def), [("id__in", "1,2,3")])?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![(json!({"id": {"$in": ["1", "2", "3"]}}), plain())]
    );
    Ok(())
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_fans_out_to_disjunction() -> anyhow::Result<()> {
    let def = Arc::new(
        FilterDefinition::builder("UserFilter")
            .field("search")
            .search("search", ["name", "email"])
            .build()?,
    );
    let filter = Filter::new(def).with("search", "bob")?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![(
            json!({"$or": [
                {"name": {"$regex": ".*bob.*", "$options": "i"}},
                {"email": {"$regex": ".*bob.*", "$options": "i"}}
            ]}),
            plain()
        )]
    );
    Ok(())
}

#[test]
fn test_search_field_without_model_fields_is_plain_equality() -> anyhow::Result<()> {
    let def = Arc::new(
        FilterDefinition::builder("F")
            .field("search")
            .search("search", Vec::<String>::new())
            .build()?,
    );
    let filter = Filter::new(def).with("search", "bob")?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(pairs(&conditions), vec![(json!({"search": "bob"}), plain())]);
    Ok(())
}

#[test]
fn test_search_with_delimiter_in_name_is_not_split() -> anyhow::Result<()> {
    let def = Arc::new(
        FilterDefinition::builder("F")
            .search("full__text", ["title"])
            .build()?,
    );
    let filter = Filter::new(def).with("full__text", "x")?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![(json!({"$or": [{"title": {"$regex": ".*x.*", "$options": "i"}}]}), plain())]
    );
    Ok(())
}

// =============================================================================
// Nested sub-filters
// =============================================================================

#[test]
fn test_nested_filter_emits_guard_then_rewritten_predicates() -> anyhow::Result<()> {
    let author = Filter::new(author_definition()).with("count__gte", 10)?;
    let filter = Filter::new(post_definition()).with("author", author)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![
            (json!({"author": {"$ne": null}}), ExecutionOptions::linked(1)),
            (json!({"author.count": {"$gte": 10}}), ExecutionOptions::linked(1)),
        ]
    );
    Ok(())
}

#[test]
fn test_empty_nested_filter_is_invisible() -> anyhow::Result<()> {
    let filter = Filter::new(post_definition())
        .with("author", Filter::new(author_definition()))?
        .with("title", "rust")?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(pairs(&conditions), vec![(json!({"title": "rust"}), plain())]);
    Ok(())
}

#[test]
fn test_nested_filter_holding_only_empty_sub_filter_is_invisible() -> anyhow::Result<()> {
    let author = Filter::new(author_definition()).with("company", Filter::new(company_definition()))?;
    let filter = Filter::new(post_definition()).with("author", author)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert!(conditions.is_empty());
    Ok(())
}

#[test]
fn test_two_level_nesting_records_deepest_depth() -> anyhow::Result<()> {
    let company = Filter::new(company_definition()).with("country", "NL")?;
    let author = Filter::new(author_definition())
        .with("name", "ann")?
        .with("company", company)?;
    let filter = Filter::new(post_definition()).with("author", author)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![
            (json!({"author": {"$ne": null}}), ExecutionOptions::linked(1)),
            (json!({"author.name": "ann"}), ExecutionOptions::linked(1)),
            (json!({"author.company": {"$ne": null}}), ExecutionOptions::linked(2)),
            (json!({"author.company.country": "NL"}), ExecutionOptions::linked(2)),
        ]
    );
    Ok(())
}

#[test]
fn test_nested_search_prefixes_each_branch() -> anyhow::Result<()> {
    let author = Filter::new(author_definition()).with("search", "ann")?;
    let filter = Filter::new(post_definition()).with("author", author)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(conditions.len(), 2);
    assert_eq!(
        conditions[1].predicate.to_document(),
        json!({"$or": [
            {"author.name": {"$regex": ".*ann.*", "$options": "i"}},
            {"author.bio": {"$regex": ".*ann.*", "$options": "i"}}
        ]})
    );
    assert_eq!(conditions[1].options, ExecutionOptions::linked(1));
    Ok(())
}

#[test]
fn test_nested_isnull_true_keeps_guard_only() -> anyhow::Result<()> {
    let inner = Arc::new(
        FilterDefinition::builder("Inner")
            .field("removed__isnull")
            .build()?,
    );
    let outer = post_definition_with_inner(inner.clone())?;
    let filter = Filter::new(outer).with("inner", Filter::new(inner).with("removed__isnull", true)?)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(
        pairs(&conditions),
        vec![(json!({"inner": {"$ne": null}}), ExecutionOptions::linked(1))]
    );
    Ok(())
}

fn post_definition_with_inner(inner: Arc<FilterDefinition>) -> anyhow::Result<Arc<FilterDefinition>> {
    Ok(Arc::new(
        FilterDefinition::builder("Outer").nested("inner", inner).build()?,
    ))
}

#[test]
fn test_sibling_order_is_declaration_order() -> anyhow::Result<()> {
    let author = Filter::new(author_definition()).with("name", "ann")?;
    let filter = Filter::new(post_definition())
        .with("views__lt", 100)?
        .with("author", author)?
        .with("title", "rust")?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    let documents: Vec<_> = conditions.iter().map(|c| c.predicate.to_document()).collect();
    assert_eq!(
        documents,
        vec![
            json!({"title": "rust"}),
            json!({"author": {"$ne": null}}),
            json!({"author.name": "ann"}),
            json!({"views": {"$lt": 100}}),
        ]
    );
    Ok(())
}

#[test]
fn test_compile_at_explicit_depth() -> anyhow::Result<()> {
    let author = Filter::new(author_definition()).with("name", "ann")?;
    let filter = Filter::new(post_definition()).with("author", author)?;

    let conditions = ConditionCompiler::new().compile(&filter, 3)?;
    assert!(conditions.iter().all(|c| c.options.nesting_depth == Some(3)));
    Ok(())
}

#[test]
fn test_nested_through_custom_author_definition() -> anyhow::Result<()> {
    let author_def = Arc::new(FilterDefinition::builder("A").field("age__gt").build()?);
    let filter = Filter::new(post_definition_with(author_def.clone()))
        .with("author", Filter::new(author_def).with("age__gt", 30)?)?;

    let conditions = ConditionCompiler::new().get(&filter)?;
    assert_eq!(conditions[1].predicate.to_document(), json!({"author.age": {"$gt": 30}}));
    Ok(())
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_compiler_is_shareable_across_threads() -> anyhow::Result<()> {
    let compiler = Arc::new(ConditionCompiler::new());
    let filter = Arc::new(Filter::new(post_definition()).with("title", "rust")?);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let compiler = compiler.clone();
            let filter = filter.clone();
            std::thread::spawn(move || compiler.get(&filter).map(|c| c.len()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread panicked")?, 1);
    }
    Ok(())
}
