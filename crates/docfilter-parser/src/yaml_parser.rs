//! YAML helpers for definition documents
//!
//! Thin accessors over `serde_yaml::Value` plus key checking. Definition
//! files are hand written, so an unknown key is reported together with the
//! closest accepted key.

use crate::error::{ParseError, Result};
use serde::Deserialize;
use serde_yaml::{Sequence, Value as YamlValue};
use std::fmt;

/// Largest edit distance still offered as a suggestion
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Keys people reach for that mean something else in a definition
const KEY_ALIASES: &[(&str, &str)] = &[
    ("filters", "fields"),
    ("order_by", "ordering_field"),
    ("ordering", "ordering_field"),
    ("sort", "ordering_field"),
    ("search_fields", "model_fields"),
    ("search_field", "field"),
    ("kind", "type"),
    ("ref", "nested"),
    ("filter", "nested"),
];

/// A mapping key that is not accepted in its section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    pub key: String,
    pub section: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown key '{}' in {}.", self.key, self.section)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " Did you mean '{}'?", suggestion)?;
        }
        Ok(())
    }
}

/// YAML accessors used by the definition parser
pub struct YamlParser;

impl YamlParser {
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Split a `---` separated string into its non-empty documents
    pub fn parse_multi_document(yaml_str: &str) -> Result<Vec<YamlValue>> {
        serde_yaml::Deserializer::from_str(yaml_str)
            .map(YamlValue::deserialize)
            .filter(|document| !matches!(document, Ok(YamlValue::Null)))
            .map(|document| document.map_err(ParseError::from))
            .collect()
    }

    pub fn get_string(obj: &YamlValue, key: &str) -> Result<String> {
        Self::get_optional_string(obj, key).ok_or_else(|| ParseError::MissingField {
            field: key.to_string(),
        })
    }

    pub fn get_optional_string(obj: &YamlValue, key: &str) -> Option<String> {
        obj.get(key)?.as_str().map(str::to_owned)
    }

    /// Optional list of strings; a present value of any other shape is an error
    pub fn get_optional_string_list(obj: &YamlValue, key: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = obj.get(key) else {
            return Ok(None);
        };

        let strings = value.as_sequence().and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
        });

        strings.map(Some).ok_or_else(|| ParseError::InvalidValue {
            field: key.to_string(),
            message: "expected a list of strings".to_string(),
        })
    }

    pub fn get_optional_array<'a>(obj: &'a YamlValue, key: &str) -> Option<&'a Sequence> {
        obj.get(key)?.as_sequence()
    }

    /// Keys of `obj` not listed in `accepted`, in document order
    pub fn unknown_keys(obj: &YamlValue, accepted: &[&str], section: &str) -> Vec<UnknownKey> {
        let Some(mapping) = obj.as_mapping() else {
            return Vec::new();
        };

        mapping
            .keys()
            .filter_map(YamlValue::as_str)
            .filter(|key| !accepted.contains(key))
            .map(|key| UnknownKey {
                key: key.to_string(),
                section: section.to_string(),
                suggestion: suggest(key, accepted),
            })
            .collect()
    }

    /// Reject `obj` if it carries any key outside `accepted`
    pub fn validate_fields_strict(obj: &YamlValue, accepted: &[&str], section: &str) -> Result<()> {
        let unknown = Self::unknown_keys(obj, accepted, section);
        if unknown.is_empty() {
            return Ok(());
        }

        let messages: Vec<String> = unknown.iter().map(ToString::to_string).collect();
        for message in &messages {
            log::error!("Definition key rejected: {}", message);
        }

        Err(ParseError::InvalidValue {
            field: section.to_string(),
            message: messages.join("; "),
        })
    }
}

/// Closest accepted key: an alias first, then the nearest by edit distance
fn suggest(key: &str, accepted: &[&str]) -> Option<String> {
    let alias = KEY_ALIASES
        .iter()
        .find(|(from, to)| *from == key && accepted.contains(to))
        .map(|(_, to)| *to);

    alias
        .or_else(|| {
            accepted
                .iter()
                .map(|candidate| (edit_distance(key, candidate), *candidate))
                .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
                .min_by_key(|(distance, _)| *distance)
                .map(|(_, candidate)| candidate)
        })
        .map(str::to_owned)
}

/// Levenshtein distance over chars, two rows at a time
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_document_skips_empty() {
        let yaml = "filter:\n  name: A\n---\n---\nfilter:\n  name: B\n";
        let docs = YamlParser::parse_multi_document(yaml).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_get_optional_string_list() {
        let yaml = YamlParser::parse("fields: [a, b]\nbad: [1, x]\nscalar: a\n").unwrap();
        assert_eq!(
            YamlParser::get_optional_string_list(&yaml, "fields").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(YamlParser::get_optional_string_list(&yaml, "missing").unwrap(), None);
        assert!(YamlParser::get_optional_string_list(&yaml, "bad").is_err());
        assert!(YamlParser::get_optional_string_list(&yaml, "scalar").is_err());
    }

    #[test]
    fn test_unknown_keys_carry_suggestions() {
        let yaml = YamlParser::parse("nme: x\nkind: integer\nzzz: 1\n").unwrap();
        let unknown = YamlParser::unknown_keys(&yaml, &["name", "type", "nested"], "field");

        let suggestions: Vec<Option<&str>> =
            unknown.iter().map(|u| u.suggestion.as_deref()).collect();
        assert_eq!(suggestions, vec![Some("name"), Some("type"), None]);
        assert_eq!(unknown[0].to_string(), "Unknown key 'nme' in field. Did you mean 'name'?");
    }

    #[test]
    fn test_alias_only_suggested_when_accepted() {
        assert_eq!(suggest("order_by", &["name", "ordering_field"]), Some("ordering_field".to_string()));
        assert_eq!(suggest("kind", &["name"]), None);
    }

    #[test]
    fn test_validate_fields_strict() {
        let yaml = YamlParser::parse("name: x\n").unwrap();
        assert!(YamlParser::validate_fields_strict(&yaml, &["name"], "filter").is_ok());

        let err = YamlParser::validate_fields_strict(&yaml, &["title"], "filter").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "filter"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("fields", "fields"), 0);
        assert_eq!(edit_distance("feilds", "fields"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("nested", "nestd"), 1);
    }
}
