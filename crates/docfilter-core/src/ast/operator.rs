//! Filter field operators
//!
//! The operator vocabulary is fixed and closed. A field name like `age__gte`
//! carries its operator as the token after the last `__`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operator applied to a filter field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Not equal (`neq`, `not`, `ne`)
    Ne,
    /// Greater than (`gt`)
    Gt,
    /// Greater than or equal (`gte`)
    Gte,
    /// Less than (`lt`)
    Lt,
    /// Less than or equal (`lte`)
    Lte,
    /// Membership (`in`)
    In,
    /// Not membership (`not_in`, `nin`)
    NotIn,
    /// Case-sensitive substring match (`like`)
    Like,
    /// Case-insensitive substring match (`ilike`)
    ILike,
    /// Field existence (`exists`)
    Exists,
    /// Null check (`isnull`)
    IsNull,
}

/// Every accepted suffix token and the operator it maps to
pub const OPERATOR_TOKENS: &[(&str, Operator)] = &[
    ("neq", Operator::Ne),
    ("not", Operator::Ne),
    ("ne", Operator::Ne),
    ("gt", Operator::Gt),
    ("gte", Operator::Gte),
    ("lt", Operator::Lt),
    ("lte", Operator::Lte),
    ("in", Operator::In),
    ("not_in", Operator::NotIn),
    ("nin", Operator::NotIn),
    ("like", Operator::Like),
    ("ilike", Operator::ILike),
    ("exists", Operator::Exists),
    ("isnull", Operator::IsNull),
];

impl Operator {
    /// Look up an operator by its suffix token
    pub fn from_token(token: &str) -> Option<Operator> {
        OPERATOR_TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, op)| *op)
    }

    /// Canonical suffix token
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::NotIn => "nin",
            Operator::Like => "like",
            Operator::ILike => "ilike",
            Operator::Exists => "exists",
            Operator::IsNull => "isnull",
        }
    }

    /// Returns true if the operator takes a list of values
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Returns true if the operator takes a boolean value
    pub fn is_boolean(&self) -> bool {
        matches!(self, Operator::Exists | Operator::IsNull)
    }

    /// Returns true if the operator is an ordering comparison
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_token(s).ok_or_else(|| format!("unknown operator '{}'", s))
    }
}
