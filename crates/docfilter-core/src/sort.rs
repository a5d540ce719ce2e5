//! Sort keys
//!
//! Ordering values arrive as field names optionally prefixed with `-`
//! (descending) or `+` (ascending).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Store-level direction value (`1` / `-1`)
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse `-field`, `+field` or `field`
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(field) = raw.strip_prefix('-') {
            Self::descending(field)
        } else if let Some(field) = raw.strip_prefix('+') {
            Self::ascending(field)
        } else {
            Self::ascending(raw)
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "+{}", self.field),
            SortDirection::Descending => write!(f, "-{}", self.field),
        }
    }
}

/// A query handle that can be ordered
pub trait SortableQuery: Sized {
    /// Apply the keys in order and return the modified query
    fn sort_by(self, keys: &[SortKey]) -> Self;
}
