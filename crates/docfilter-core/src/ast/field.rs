//! Filter field names
//!
//! A filter field name is a chain of path segments joined by `__`, optionally
//! followed by an operator token: `author__name__ilike` targets the document
//! path `author.name` with the `ilike` operator.

use super::operator::Operator;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Separator between path segments and the operator in a field name
pub const SUFFIX_DELIMITER: &str = "__";

/// A declared filter field, decomposed once at definition time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    /// Field name as declared (e.g. `count__lte`)
    pub name: String,
    /// Dotted document path (e.g. `count`)
    pub path: String,
    /// Operator, `None` meaning plain equality
    pub operator: Option<Operator>,
}

impl FilterField {
    /// Decompose a field name into its path and operator
    ///
    /// Names without the delimiter are plain equality fields.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(CoreError::InvalidFieldName(name.to_string()));
        }

        if !name.contains(SUFFIX_DELIMITER) {
            return Ok(Self::plain(name));
        }

        let mut parts: Vec<&str> = name.split(SUFFIX_DELIMITER).collect();
        // split on a non-empty string always yields at least one part
        let token = parts.pop().unwrap_or_default();

        if parts.iter().any(|p| p.is_empty()) {
            return Err(CoreError::InvalidFieldName(name.to_string()));
        }

        let operator = Operator::from_token(token).ok_or_else(|| CoreError::UnknownOperator {
            field: name.to_string(),
            operator: token.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            path: parts.join("."),
            operator: Some(operator),
        })
    }

    /// A field that is never split on the delimiter
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            operator: None,
        }
    }

    /// Returns true if the name carried an operator suffix
    pub fn has_operator(&self) -> bool {
        self.operator.is_some()
    }
}
