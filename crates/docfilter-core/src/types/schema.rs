//! Filter definitions
//!
//! A definition declares which filter fields exist, the kind of value each
//! one accepts, and the static search/ordering metadata. Field names are
//! decomposed into path and operator when the definition is built, so an
//! unknown operator suffix never reaches the compiler.

use crate::ast::{FilterField, Operator};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Default name of the ordering field
pub const DEFAULT_ORDERING_FIELD: &str = "order_by";

/// Kind of value a declared field accepts
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// List of items of the given kind
    List(Box<FieldKind>),
    /// Sub-filter over a linked document
    Nested(Arc<FilterDefinition>),
}

impl FieldKind {
    /// Kind inferred from an operator when none is declared
    pub fn infer(operator: Option<Operator>) -> FieldKind {
        match operator {
            Some(op) if op.is_membership() => FieldKind::List(Box::new(FieldKind::String)),
            Some(op) if op.is_boolean() => FieldKind::Boolean,
            _ => FieldKind::String,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldKind::List(_))
    }

    pub fn nested_definition(&self) -> Option<&Arc<FilterDefinition>> {
        match self {
            FieldKind::Nested(def) => Some(def),
            _ => None,
        }
    }

    /// Short human-readable name
    pub fn describe(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::List(item) => format!("list of {}", item.describe()),
            FieldKind::Nested(def) => format!("sub-filter '{}'", def.name()),
        }
    }
}

/// Static per-definition metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConstants {
    /// Field holding the sort keys
    pub ordering_field_name: String,

    /// Field reserved for free-text search
    #[serde(default)]
    pub search_field_name: Option<String>,

    /// Fields the search fans out to, in declaration order
    #[serde(default)]
    pub search_model_fields: Vec<String>,

    /// Document fields accepted as sort keys; unchecked when absent
    #[serde(default)]
    pub model_fields: Option<Vec<String>>,
}

impl Default for FilterConstants {
    fn default() -> Self {
        Self {
            ordering_field_name: DEFAULT_ORDERING_FIELD.to_string(),
            search_field_name: None,
            search_model_fields: Vec::new(),
            model_fields: None,
        }
    }
}

/// A field declared on a filter definition
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredField {
    pub field: FilterField,
    pub kind: FieldKind,
}

impl DeclaredField {
    pub fn name(&self) -> &str {
        &self.field.name
    }
}

/// A validated filter definition
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDefinition {
    name: String,
    fields: Vec<DeclaredField>,
    constants: FilterConstants,
}

impl FilterDefinition {
    /// Start building a definition
    pub fn builder(name: impl Into<String>) -> FilterDefinitionBuilder {
        FilterDefinitionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[DeclaredField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&DeclaredField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn constants(&self) -> &FilterConstants {
        &self.constants
    }

    pub fn ordering_field_name(&self) -> &str {
        &self.constants.ordering_field_name
    }

    /// Returns true if `name` is the reserved search field and the search
    /// fans out to at least one field
    pub fn is_search_field(&self, name: &str) -> bool {
        self.constants.search_field_name.as_deref() == Some(name)
            && !self.constants.search_model_fields.is_empty()
    }

    pub fn search_model_fields(&self) -> &[String] {
        &self.constants.search_model_fields
    }

    /// Definition behind a nested field
    pub fn nested_definition(&self, name: &str) -> Option<&Arc<FilterDefinition>> {
        self.field(name).and_then(|f| f.kind.nested_definition())
    }
}

/// Builder for [`FilterDefinition`]
///
/// # Example
///
/// ```rust
/// use docfilter_core::FilterDefinition;
///
/// let definition = FilterDefinition::builder("UserFilter")
///     .field("name")
///     .field("age__gte")
///     .field("id__in")
///     .search("search", ["name", "email"])
///     .build()
///     .unwrap();
///
/// assert_eq!(definition.fields().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct FilterDefinitionBuilder {
    name: String,
    fields: Vec<(String, Option<FieldKind>)>,
    constants: FilterConstants,
}

impl FilterDefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constants: FilterConstants::default(),
        }
    }

    /// Declare a field whose value kind is inferred from its operator
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push((name.into(), None));
        self
    }

    /// Declare a field with an explicit value kind
    ///
    /// Membership fields wrap a scalar kind into a list of that kind.
    pub fn typed_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push((name.into(), Some(kind)));
        self
    }

    /// Declare a sub-filter over a linked document
    pub fn nested(mut self, name: impl Into<String>, definition: Arc<FilterDefinition>) -> Self {
        self.fields
            .push((name.into(), Some(FieldKind::Nested(definition))));
        self
    }

    /// Reserve a free-text search field fanning out to `fields`
    pub fn search<I, S>(mut self, field_name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constants.search_field_name = Some(field_name.into());
        self.constants.search_model_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn ordering_field(mut self, name: impl Into<String>) -> Self {
        self.constants.ordering_field_name = name.into();
        self
    }

    /// Document fields accepted as sort keys
    pub fn model_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constants.model_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Replace all constants at once
    pub fn constants(mut self, constants: FilterConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Validate every declared field and build the definition
    pub fn build(self) -> Result<FilterDefinition> {
        let FilterDefinitionBuilder {
            name,
            fields: pending,
            mut constants,
        } = self;

        let mut seen_search = HashSet::new();
        constants
            .search_model_fields
            .retain(|f| seen_search.insert(f.clone()));

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(pending.len() + 1);

        for (field_name, kind) in pending {
            if field_name == constants.ordering_field_name {
                return Err(CoreError::ReservedFieldName(field_name));
            }
            if !seen.insert(field_name.clone()) {
                return Err(CoreError::DuplicateField(field_name));
            }

            let is_nested = matches!(kind, Some(FieldKind::Nested(_)));
            let is_search = constants.search_field_name.as_deref() == Some(field_name.as_str());

            let field = if is_nested || is_search {
                if field_name.is_empty() {
                    return Err(CoreError::InvalidFieldName(field_name));
                }
                FilterField::plain(&field_name)
            } else {
                FilterField::parse(&field_name)?
            };

            let kind = match kind {
                None => FieldKind::infer(field.operator),
                Some(kind) => match field.operator {
                    Some(op) if op.is_membership() && !kind.is_list() => {
                        FieldKind::List(Box::new(kind))
                    }
                    _ => kind,
                },
            };

            fields.push(DeclaredField { field, kind });
        }

        if let Some(search) = &constants.search_field_name {
            if !seen.contains(search) {
                if *search == constants.ordering_field_name {
                    return Err(CoreError::ReservedFieldName(search.clone()));
                }
                fields.push(DeclaredField {
                    field: FilterField::plain(search),
                    kind: FieldKind::String,
                });
            }
        }

        log::debug!(
            "Built filter definition '{}' with {} field(s)",
            name,
            fields.len()
        );

        Ok(FilterDefinition {
            name,
            fields,
            constants,
        })
    }
}
