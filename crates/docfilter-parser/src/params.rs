//! Query parameter binding
//!
//! Turns raw `(key, value)` string pairs, as found in a query string, into a
//! populated [`Filter`]:
//!
//! - list fields (`__in`, `__not_in`, `__nin`) and the ordering field are
//!   split on `,`; an empty string is an empty list
//! - scalars are coerced to the declared field kind
//! - `author__name=x` is routed to the `name` field of the nested `author`
//!   filter
//! - ordering values are checked against the definition's model fields

use crate::error::{ParseError, Result};
use docfilter_core::types::DeclaredField;
use docfilter_core::{FieldKind, Filter, FilterDefinition, FilterValue, SortKey};
use docfilter_core::ast::SUFFIX_DELIMITER;
use serde_json::{Number, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Raw parameter binder
#[derive(Debug, Clone)]
pub struct ParamsParser {
    validate_ordering: bool,
}

impl Default for ParamsParser {
    fn default() -> Self {
        Self {
            validate_ordering: true,
        }
    }
}

impl ParamsParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check ordering values against the definition's model fields
    pub fn validate_ordering(mut self, enabled: bool) -> Self {
        self.validate_ordering = enabled;
        self
    }

    /// Bind raw parameters to a new filter of `definition`
    pub fn parse<I, K, V>(&self, definition: &Arc<FilterDefinition>, params: I) -> Result<Filter>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        self.bind(definition, &pairs)
    }

    fn bind(&self, definition: &Arc<FilterDefinition>, pairs: &[(String, String)]) -> Result<Filter> {
        let mut filter = Filter::new(definition.clone());
        let mut nested: Vec<(String, Vec<(String, String)>)> = Vec::new();

        for (key, raw) in pairs {
            if key == definition.ordering_field_name() {
                let ordering = split_ordering(raw);
                if self.validate_ordering {
                    validate_ordering(definition, &ordering)?;
                }
                filter.set_ordering(ordering);
                continue;
            }

            match definition.field(key) {
                Some(declared) if declared.kind.nested_definition().is_some() => {
                    return Err(ParseError::InvalidValue {
                        field: key.clone(),
                        message: format!(
                            "nested filter expects prefixed parameters such as '{}{}<field>'",
                            key, SUFFIX_DELIMITER
                        ),
                    });
                }
                Some(declared) => {
                    let value = coerce(declared, raw)?;
                    let value = match (filter.get_value(key), value) {
                        (Some(FilterValue::List(previous)), FilterValue::List(items)) => {
                            let mut merged = previous.clone();
                            merged.extend(items);
                            FilterValue::List(merged)
                        }
                        (_, value) => value,
                    };
                    filter.set(key, value)?;
                }
                None => {
                    let (parent, sub_key) = route_nested(definition, key)
                        .ok_or_else(|| ParseError::UnknownField(key.clone()))?;
                    match nested.iter_mut().find(|(name, _)| *name == parent) {
                        Some((_, group)) => group.push((sub_key, raw.clone())),
                        None => nested.push((parent, vec![(sub_key, raw.clone())])),
                    }
                }
            }
        }

        for (parent, group) in nested {
            if let Some(sub_definition) = definition.nested_definition(&parent) {
                let sub_filter = self.bind(sub_definition, &group)?;
                filter.set(&parent, sub_filter)?;
            }
        }

        Ok(filter)
    }
}

/// Split a comma-separated value; an empty string is an empty list
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.to_string()).collect()
}

fn split_ordering(raw: &str) -> Vec<String> {
    split_list(raw)
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Find the nested field `key` is prefixed with, preferring the longest name
fn route_nested(definition: &FilterDefinition, key: &str) -> Option<(String, String)> {
    definition
        .fields()
        .iter()
        .filter(|f| f.kind.nested_definition().is_some())
        .filter_map(|f| {
            let rest = key.strip_prefix(f.name())?.strip_prefix(SUFFIX_DELIMITER)?;
            (!rest.is_empty()).then(|| (f.name().to_string(), rest.to_string()))
        })
        .max_by_key(|(parent, _)| parent.len())
}

fn validate_ordering(definition: &FilterDefinition, ordering: &[String]) -> Result<()> {
    let Some(model_fields) = &definition.constants().model_fields else {
        return Ok(());
    };
    let ordering_field = definition.ordering_field_name();

    let mut usages: HashMap<String, Vec<&str>> = HashMap::new();
    let mut ambiguous: Vec<String> = Vec::new();

    for raw in ordering {
        let field = SortKey::parse(raw).field;
        if !model_fields.contains(&field) {
            return Err(ParseError::InvalidOrdering {
                field: ordering_field.to_string(),
                message: format!("{} is not a valid ordering field", field),
            });
        }
        let entry = usages.entry(field.clone()).or_default();
        entry.push(raw);
        if entry.len() == 2 {
            ambiguous.push(field);
        }
    }

    if !ambiguous.is_empty() {
        let details: Vec<String> = ambiguous
            .iter()
            .map(|field| format!("{}: {}", field, usages[field].join(", ")))
            .collect();
        return Err(ParseError::InvalidOrdering {
            field: ordering_field.to_string(),
            message: format!(
                "field names can appear at most once, the following was ambiguous: {}",
                details.join("; ")
            ),
        });
    }

    Ok(())
}

fn coerce(declared: &DeclaredField, raw: &str) -> Result<FilterValue> {
    match &declared.kind {
        FieldKind::List(item) => split_list(raw)
            .iter()
            .map(|part| coerce_scalar(declared.name(), item, part))
            .collect::<Result<Vec<_>>>()
            .map(FilterValue::List),
        FieldKind::Boolean => parse_bool(declared.name(), raw).map(FilterValue::Bool),
        kind => coerce_scalar(declared.name(), kind, raw).map(FilterValue::Scalar),
    }
}

fn coerce_scalar(field: &str, kind: &FieldKind, raw: &str) -> Result<JsonValue> {
    let invalid = |expected: &str| ParseError::InvalidValue {
        field: field.to_string(),
        message: format!("'{}' is not a valid {}", raw, expected),
    };

    match kind {
        FieldKind::String => Ok(JsonValue::String(raw.to_string())),
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(JsonValue::from)
            .map_err(|_| invalid("integer")),
        FieldKind::Number => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .ok_or_else(|| invalid("number")),
        FieldKind::Boolean => parse_bool(field, raw).map(JsonValue::Bool),
        FieldKind::List(_) | FieldKind::Nested(_) => Err(ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("cannot bind a {} inside a list", kind.describe()),
        }),
    }
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("'{}' is not a valid boolean", raw),
        }),
    }
}
