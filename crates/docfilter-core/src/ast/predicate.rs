//! Predicates and execution options
//!
//! A predicate constrains one document path, either by equality or by an
//! operator expression. The search fan-out is the only predicate without a
//! path of its own: it is a disjunction of field predicates.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};

/// Operator expression applied to a document path
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `{"$ne": value}`
    Ne(JsonValue),
    /// `{"$gt": value}`
    Gt(JsonValue),
    /// `{"$gte": value}`
    Gte(JsonValue),
    /// `{"$lt": value}`
    Lt(JsonValue),
    /// `{"$lte": value}`
    Lte(JsonValue),
    /// `{"$in": value}`
    In(JsonValue),
    /// `{"$nin": value}`
    NotIn(JsonValue),
    /// `{"$regex": pattern}`, plus `"$options": "i"` when case-insensitive
    Regex {
        pattern: String,
        case_insensitive: bool,
    },
    /// `{"$exists": value}`
    Exists(JsonValue),
}

impl Expression {
    /// The store-level operator key identifying this expression
    pub fn key(&self) -> &'static str {
        match self {
            Expression::Ne(_) => "$ne",
            Expression::Gt(_) => "$gt",
            Expression::Gte(_) => "$gte",
            Expression::Lt(_) => "$lt",
            Expression::Lte(_) => "$lte",
            Expression::In(_) => "$in",
            Expression::NotIn(_) => "$nin",
            Expression::Regex { .. } => "$regex",
            Expression::Exists(_) => "$exists",
        }
    }

    /// Render as a store-level operator document
    pub fn to_document(&self) -> JsonValue {
        let mut doc = Map::new();
        match self {
            Expression::Ne(v)
            | Expression::Gt(v)
            | Expression::Gte(v)
            | Expression::Lt(v)
            | Expression::Lte(v)
            | Expression::In(v)
            | Expression::NotIn(v)
            | Expression::Exists(v) => {
                doc.insert(self.key().to_string(), v.clone());
            }
            Expression::Regex {
                pattern,
                case_insensitive,
            } => {
                doc.insert(self.key().to_string(), JsonValue::String(pattern.clone()));
                if *case_insensitive {
                    doc.insert("$options".to_string(), JsonValue::String("i".to_string()));
                }
            }
        }
        JsonValue::Object(doc)
    }
}

/// Constraint on a single document path
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Literal equality
    Equals(JsonValue),
    /// Operator expression
    Expression(Expression),
}

impl Condition {
    pub fn to_document(&self) -> JsonValue {
        match self {
            Condition::Equals(v) => v.clone(),
            Condition::Expression(expr) => expr.to_document(),
        }
    }
}

/// A single query constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `{path: condition}`
    Field { path: String, condition: Condition },
    /// `{"$or": [...]}`
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Equality predicate
    pub fn equals(path: impl Into<String>, value: JsonValue) -> Self {
        Predicate::Field {
            path: path.into(),
            condition: Condition::Equals(value),
        }
    }

    /// Operator expression predicate
    pub fn expression(path: impl Into<String>, expression: Expression) -> Self {
        Predicate::Field {
            path: path.into(),
            condition: Condition::Expression(expression),
        }
    }

    /// Disjunction of predicates
    pub fn any(predicates: Vec<Predicate>) -> Self {
        Predicate::Any(predicates)
    }

    /// The constrained path, `None` for a disjunction
    pub fn path(&self) -> Option<&str> {
        match self {
            Predicate::Field { path, .. } => Some(path),
            Predicate::Any(_) => None,
        }
    }

    /// Re-root the predicate under a parent field: `count` becomes `author.count`
    ///
    /// A disjunction is re-rooted branch by branch.
    pub fn prefixed(&self, parent: &str) -> Self {
        match self {
            Predicate::Field { path, condition } => Predicate::Field {
                path: format!("{}.{}", parent, path),
                condition: condition.clone(),
            },
            Predicate::Any(branches) => {
                Predicate::Any(branches.iter().map(|b| b.prefixed(parent)).collect())
            }
        }
    }

    /// Render as a store-level query document
    pub fn to_document(&self) -> JsonValue {
        match self {
            Predicate::Field { path, condition } => {
                let mut doc = Map::new();
                doc.insert(path.clone(), condition.to_document());
                JsonValue::Object(doc)
            }
            Predicate::Any(branches) => {
                let docs: Vec<JsonValue> = branches.iter().map(Predicate::to_document).collect();
                json!({ "$or": docs })
            }
        }
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

/// Per-predicate hints for the query executor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOptions {
    /// Resolving the predicate requires fetching a linked document
    pub fetch_links: bool,
    /// Sub-filter level the predicate originates from, starting at 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nesting_depth: Option<u32>,
}

impl ExecutionOptions {
    /// Options for a predicate that needs linked documents at `depth`
    pub fn linked(depth: u32) -> Self {
        Self {
            fetch_links: true,
            nesting_depth: Some(depth),
        }
    }

    /// Combine enclosing-level options with the options of an inner predicate
    ///
    /// Link fetching is required if either side requires it; the inner depth,
    /// when recorded, overrides the outer one.
    pub fn merge(outer: ExecutionOptions, inner: ExecutionOptions) -> ExecutionOptions {
        ExecutionOptions {
            fetch_links: outer.fetch_links || inner.fetch_links,
            nesting_depth: inner.nesting_depth.or(outer.nesting_depth),
        }
    }
}
