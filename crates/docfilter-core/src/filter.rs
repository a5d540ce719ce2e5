//! Filter instances
//!
//! A `Filter` is one definition plus the values a caller actually set.
//! Values are stored by declaration position, so iteration always follows
//! the order in which the fields were declared.

use crate::error::{CoreError, Result};
use crate::sort::{SortKey, SortableQuery};
use crate::types::{DeclaredField, FieldKind, FilterDefinition, FilterValue};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// A filter definition with its set values
#[derive(Debug, Clone)]
pub struct Filter {
    definition: Arc<FilterDefinition>,
    values: Vec<Option<FilterValue>>,
    ordering: Vec<String>,
}

impl Filter {
    /// Create a filter with no values set
    pub fn new(definition: Arc<FilterDefinition>) -> Self {
        let values = vec![None; definition.fields().len()];
        Self {
            definition,
            values,
            ordering: Vec::new(),
        }
    }

    pub fn definition(&self) -> &Arc<FilterDefinition> {
        &self.definition
    }

    /// Set the value of a declared field
    pub fn set(&mut self, name: &str, value: impl Into<FilterValue>) -> Result<&mut Self> {
        let index = self.position(name)?;
        let value = value.into();
        check_kind(&self.definition.fields()[index], &value)?;
        self.values[index] = Some(value);
        Ok(self)
    }

    /// Builder-style [`Filter::set`]
    pub fn with(mut self, name: &str, value: impl Into<FilterValue>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Clear a field, returning its previous value
    pub fn unset(&mut self, name: &str) -> Result<Option<FilterValue>> {
        let index = self.position(name)?;
        Ok(self.values[index].take())
    }

    pub fn get_value(&self, name: &str) -> Option<&FilterValue> {
        let index = self.position(name).ok()?;
        self.values[index].as_ref()
    }

    /// Replace the sort keys
    pub fn set_ordering(&mut self, ordering: Vec<String>) -> &mut Self {
        self.ordering = ordering;
        self
    }

    /// Builder-style [`Filter::set_ordering`]
    pub fn with_ordering<I, S>(mut self, ordering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ordering = ordering.into_iter().map(Into::into).collect();
        self
    }

    /// Sort keys as given by the caller, e.g. `["-created_at", "name"]`
    pub fn ordering_values(&self) -> &[String] {
        &self.ordering
    }

    /// Set fields in declaration order
    ///
    /// Unset fields and null values are skipped. The ordering field is
    /// never part of this view.
    pub fn filtering_fields(&self) -> impl Iterator<Item = (&DeclaredField, &FilterValue)> {
        self.definition
            .fields()
            .iter()
            .zip(self.values.iter())
            .filter_map(|(field, value)| match value {
                Some(v) if !v.is_null() => Some((field, v)),
                _ => None,
            })
    }

    /// Returns true if no field is set
    ///
    /// A sub-filter that is itself empty does not count as set.
    pub fn is_empty(&self) -> bool {
        self.filtering_fields().all(|(_, value)| match value {
            FilterValue::SubFilter(sub) => sub.is_empty(),
            _ => false,
        })
    }

    /// Apply the sort keys to `query`; an empty ordering leaves it untouched
    pub fn sort<Q: SortableQuery>(&self, query: Q) -> Q {
        if self.ordering.is_empty() {
            return query;
        }
        let keys: Vec<SortKey> = self.ordering.iter().map(|k| SortKey::parse(k)).collect();
        query.sort_by(&keys)
    }

    /// Set values as a JSON object keyed by field name
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (field, value) in self.filtering_fields() {
            map.insert(field.name().to_string(), value.to_json());
        }
        JsonValue::Object(map)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.definition
            .fields()
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| CoreError::UnknownField {
                filter: self.definition.name().to_string(),
                field: name.to_string(),
            })
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.definition, &other.definition) || self.definition == other.definition)
            && self.values == other.values
            && self.ordering == other.ordering
    }
}

fn check_kind(field: &DeclaredField, value: &FilterValue) -> Result<()> {
    let mismatch = || CoreError::ValueKindMismatch {
        field: field.name().to_string(),
        expected: field.kind.describe(),
    };

    match (&field.kind, value) {
        (FieldKind::Nested(expected), FilterValue::SubFilter(sub)) => {
            let actual = sub.definition();
            if Arc::ptr_eq(expected, actual) || expected == actual {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        (FieldKind::Nested(_), _) | (_, FilterValue::SubFilter(_)) => Err(mismatch()),
        _ => Ok(()),
    }
}
