//! Filter definition parser
//!
//! Parses YAML filter definitions:
//!
//! ```yaml
//! filter:
//!   name: PostFilter
//!   ordering_field: order_by
//!   model_fields: [title, views]
//!   search:
//!     field: search
//!     model_fields: [title, body]
//!   fields:
//!     - title
//!     - views__gte
//!     - name: id__in
//!       type: integer
//!     - name: author
//!       nested: AuthorFilter
//! ```
//!
//! Several definitions may share one file, separated by `---`. Nested
//! fields refer to other definitions by name, in any order.

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use docfilter_core::types::DEFAULT_ORDERING_FIELD;
use docfilter_core::{FieldKind, FilterConstants, FilterDefinition};
use serde_yaml::Value as YamlValue;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const DOCUMENT_FIELDS: &[&str] = &["filter"];
const FILTER_FIELDS: &[&str] = &["name", "ordering_field", "model_fields", "search", "fields"];
const SEARCH_FIELDS: &[&str] = &["field", "model_fields"];
const FIELD_FIELDS: &[&str] = &["name", "type", "nested"];

/// Default reserved search field name in definition files
pub const DEFAULT_SEARCH_FIELD: &str = "search";

/// Named collection of resolved definitions
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: HashMap<String, Arc<FilterDefinition>>,
    order: Vec<String>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its own name
    pub fn insert(&mut self, definition: Arc<FilterDefinition>) -> Result<()> {
        let name = definition.name().to_string();
        if self.definitions.contains_key(&name) {
            return Err(ParseError::InvalidValue {
                field: "name".to_string(),
                message: format!("filter '{}' is defined more than once", name),
            });
        }
        self.order.push(name.clone());
        self.definitions.insert(name, definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FilterDefinition>> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Merge another registry into this one
    pub fn extend(&mut self, other: DefinitionRegistry) -> Result<()> {
        let DefinitionRegistry {
            mut definitions,
            order,
        } = other;
        for name in order {
            if let Some(definition) = definitions.remove(&name) {
                self.insert(definition)?;
            }
        }
        Ok(())
    }
}

/// Field entry before nested references are resolved
#[derive(Debug, Clone)]
struct RawField {
    name: String,
    kind: Option<FieldKind>,
    nested: Option<String>,
}

/// Definition before nested references are resolved
#[derive(Debug, Clone)]
struct RawDefinition {
    name: String,
    constants: FilterConstants,
    fields: Vec<RawField>,
}

/// Filter definition parser
pub struct DefinitionParser;

impl DefinitionParser {
    /// Parse a single self-contained definition
    pub fn parse(yaml_str: &str) -> Result<FilterDefinition> {
        Self::parse_with(yaml_str, &DefinitionRegistry::new())
    }

    /// Parse a single definition whose nested fields refer into `registry`
    pub fn parse_with(yaml_str: &str, registry: &DefinitionRegistry) -> Result<FilterDefinition> {
        let yaml = YamlParser::parse(yaml_str)?;
        let raw = Self::parse_raw(&yaml)?;
        Self::build(&raw, |reference| {
            registry
                .get(reference)
                .cloned()
                .ok_or_else(|| ParseError::UnknownReference {
                    filter: raw.name.clone(),
                    reference: reference.to_string(),
                })
        })
    }

    /// Parse every definition in a multi-document string
    pub fn parse_all(yaml_str: &str) -> Result<DefinitionRegistry> {
        Self::parse_all_with(yaml_str, &DefinitionRegistry::new())
    }

    /// Parse every definition in a multi-document string; nested fields may
    /// also refer to definitions already in `known`
    pub fn parse_all_with(yaml_str: &str, known: &DefinitionRegistry) -> Result<DefinitionRegistry> {
        let documents = YamlParser::parse_multi_document(yaml_str)?;

        let mut raws: Vec<RawDefinition> = Vec::with_capacity(documents.len());
        for document in &documents {
            let raw = Self::parse_raw(document)?;
            if raws.iter().any(|r| r.name == raw.name) || known.contains(&raw.name) {
                return Err(ParseError::InvalidValue {
                    field: "name".to_string(),
                    message: format!("filter '{}' is defined more than once", raw.name),
                });
            }
            raws.push(raw);
        }

        let by_name: HashMap<&str, &RawDefinition> =
            raws.iter().map(|r| (r.name.as_str(), r)).collect();
        let mut resolved: HashMap<String, Arc<FilterDefinition>> = HashMap::new();
        let mut registry = DefinitionRegistry::new();

        for raw in &raws {
            let mut visiting = Vec::new();
            let definition = Self::resolve(raw, &by_name, known, &mut resolved, &mut visiting)?;
            registry.insert(definition)?;
        }

        log::debug!("Parsed {} filter definition(s)", registry.len());
        Ok(registry)
    }

    fn resolve(
        raw: &RawDefinition,
        by_name: &HashMap<&str, &RawDefinition>,
        known: &DefinitionRegistry,
        resolved: &mut HashMap<String, Arc<FilterDefinition>>,
        visiting: &mut Vec<String>,
    ) -> Result<Arc<FilterDefinition>> {
        if let Some(definition) = resolved.get(&raw.name) {
            return Ok(definition.clone());
        }
        if visiting.contains(&raw.name) {
            visiting.push(raw.name.clone());
            return Err(ParseError::CircularReference(visiting.join(" -> ")));
        }
        visiting.push(raw.name.clone());

        let mut dependencies = HashMap::new();
        for reference in raw.fields.iter().filter_map(|f| f.nested.as_deref()) {
            let definition = if let Some(dependency) = by_name.get(reference) {
                Self::resolve(dependency, by_name, known, resolved, visiting)?
            } else if let Some(definition) = known.get(reference) {
                definition.clone()
            } else {
                return Err(ParseError::UnknownReference {
                    filter: raw.name.clone(),
                    reference: reference.to_string(),
                });
            };
            dependencies.insert(reference.to_string(), definition);
        }

        visiting.pop();

        let definition = Arc::new(Self::build(raw, |reference| {
            dependencies
                .get(reference)
                .cloned()
                .ok_or_else(|| ParseError::UnknownReference {
                    filter: raw.name.clone(),
                    reference: reference.to_string(),
                })
        })?);
        resolved.insert(raw.name.clone(), definition.clone());
        Ok(definition)
    }

    fn build<F>(raw: &RawDefinition, mut lookup: F) -> Result<FilterDefinition>
    where
        F: FnMut(&str) -> Result<Arc<FilterDefinition>>,
    {
        let mut builder = FilterDefinition::builder(raw.name.clone()).constants(raw.constants.clone());

        for field in &raw.fields {
            builder = match (&field.nested, &field.kind) {
                (Some(reference), _) => builder.nested(field.name.clone(), lookup(reference)?),
                (None, Some(kind)) => builder.typed_field(field.name.clone(), kind.clone()),
                (None, None) => builder.field(field.name.clone()),
            };
        }

        builder.build().map_err(|e| {
            log::error!("Filter definition '{}' rejected: {}", raw.name, e);
            ParseError::from(e)
        })
    }

    fn parse_raw(document: &YamlValue) -> Result<RawDefinition> {
        YamlParser::validate_fields_strict(document, DOCUMENT_FIELDS, "document")?;
        let obj = document.get("filter").ok_or_else(|| ParseError::MissingField {
            field: "filter".to_string(),
        })?;
        YamlParser::validate_fields_strict(obj, FILTER_FIELDS, "filter")?;

        let name = YamlParser::get_string(obj, "name")?;

        let mut constants = FilterConstants {
            ordering_field_name: YamlParser::get_optional_string(obj, "ordering_field")
                .unwrap_or_else(|| DEFAULT_ORDERING_FIELD.to_string()),
            model_fields: YamlParser::get_optional_string_list(obj, "model_fields")?,
            ..FilterConstants::default()
        };

        if let Some(search) = obj.get("search") {
            YamlParser::validate_fields_strict(search, SEARCH_FIELDS, "search")?;
            constants.search_field_name = Some(
                YamlParser::get_optional_string(search, "field")
                    .unwrap_or_else(|| DEFAULT_SEARCH_FIELD.to_string()),
            );
            constants.search_model_fields = YamlParser::get_optional_string_list(search, "model_fields")?
                .ok_or_else(|| ParseError::MissingField {
                    field: "search.model_fields".to_string(),
                })?;
        }

        let fields = YamlParser::get_optional_array(obj, "fields")
            .map(|items| items.iter().map(Self::parse_field).collect::<Result<Vec<_>>>())
            .transpose()?
            .unwrap_or_default();

        Ok(RawDefinition {
            name,
            constants,
            fields,
        })
    }

    fn parse_field(item: &YamlValue) -> Result<RawField> {
        if let Some(name) = item.as_str() {
            return Ok(RawField {
                name: name.to_string(),
                kind: None,
                nested: None,
            });
        }

        YamlParser::validate_fields_strict(item, FIELD_FIELDS, "field")?;
        let name = YamlParser::get_string(item, "name")?;
        let nested = YamlParser::get_optional_string(item, "nested");
        let kind = YamlParser::get_optional_string(item, "type")
            .map(|t| parse_kind(&name, &t))
            .transpose()?;

        if nested.is_some() && kind.is_some() {
            return Err(ParseError::InvalidValue {
                field: name,
                message: "'type' and 'nested' are mutually exclusive".to_string(),
            });
        }

        Ok(RawField { name, kind, nested })
    }

    /// Names of all definitions referenced by nested fields, without resolving them
    pub fn references(yaml_str: &str) -> Result<HashSet<String>> {
        let mut references = HashSet::new();
        for document in YamlParser::parse_multi_document(yaml_str)? {
            let raw = Self::parse_raw(&document)?;
            references.extend(raw.fields.into_iter().filter_map(|f| f.nested));
        }
        Ok(references)
    }
}

fn parse_kind(field: &str, kind: &str) -> Result<FieldKind> {
    match kind {
        "string" => Ok(FieldKind::String),
        "integer" => Ok(FieldKind::Integer),
        "number" => Ok(FieldKind::Number),
        "boolean" => Ok(FieldKind::Boolean),
        "list" => Ok(FieldKind::List(Box::new(FieldKind::String))),
        other => Err(ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("unknown type '{}'", other),
        }),
    }
}
