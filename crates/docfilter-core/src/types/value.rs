//! Filter field values
//!
//! A `FilterValue` is what the model layer hands over after validation and
//! coercion. Sub-filters are resolved into their own variant so the compiler
//! classifies values with a pattern match.

use crate::filter::Filter;
use serde_json::Value as JsonValue;

/// Value bound to a filter field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Scalar value (string, number or null)
    Scalar(JsonValue),
    /// List value for membership operators
    List(Vec<JsonValue>),
    /// Boolean value
    Bool(bool),
    /// Nested filter on a linked document
    SubFilter(Box<Filter>),
}

impl FilterValue {
    /// A null scalar counts as not provided
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Scalar(JsonValue::Null))
    }

    pub fn as_sub_filter(&self) -> Option<&Filter> {
        match self {
            FilterValue::SubFilter(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn is_sub_filter(&self) -> bool {
        matches!(self, FilterValue::SubFilter(_))
    }

    /// Plain JSON form of the value, sub-filters rendered as their set fields
    pub fn to_json(&self) -> JsonValue {
        match self {
            FilterValue::Scalar(v) => v.clone(),
            FilterValue::List(items) => JsonValue::Array(items.clone()),
            FilterValue::Bool(b) => JsonValue::Bool(*b),
            FilterValue::SubFilter(filter) => filter.to_json(),
        }
    }

    /// Textual form used for substring patterns
    pub fn to_text(&self) -> String {
        match self {
            FilterValue::Scalar(JsonValue::String(s)) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

impl From<JsonValue> for FilterValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Bool(b) => FilterValue::Bool(b),
            JsonValue::Array(items) => FilterValue::List(items),
            other => FilterValue::Scalar(other),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Scalar(JsonValue::String(value.to_string()))
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Scalar(JsonValue::String(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Scalar(JsonValue::from(value))
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Scalar(JsonValue::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Scalar(JsonValue::from(value))
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Filter> for FilterValue {
    fn from(filter: Filter) -> Self {
        FilterValue::SubFilter(Box::new(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_classifies() {
        assert_eq!(FilterValue::from(json!(true)), FilterValue::Bool(true));
        assert_eq!(
            FilterValue::from(json!(["a", "b"])),
            FilterValue::List(vec![json!("a"), json!("b")])
        );
        assert_eq!(FilterValue::from(json!(5)), FilterValue::Scalar(json!(5)));
        assert!(FilterValue::from(JsonValue::Null).is_null());
    }

    #[test]
    fn test_from_vec() {
        let value = FilterValue::from(vec!["1", "2"]);
        assert_eq!(value.to_json(), json!(["1", "2"]));
    }

    #[test]
    fn test_to_text() {
        assert_eq!(FilterValue::from("bob").to_text(), "bob");
        assert_eq!(FilterValue::from(42).to_text(), "42");
        assert_eq!(FilterValue::from(false).to_text(), "false");
    }
}
