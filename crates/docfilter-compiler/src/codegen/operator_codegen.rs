//! Operator transforms
//!
//! Maps an operator and a resolved value to the store-level expression.
//! `isnull` with a truthy value is the one transform that yields no
//! constraint at all: the store's own null matching already covers it.

use docfilter_core::{Expression, FilterValue, Operator};
use serde_json::Value as JsonValue;

/// Transform a value under `operator`, `None` meaning no constraint applies
pub fn transform(operator: Operator, value: &FilterValue) -> Option<Expression> {
    let expression = match operator {
        Operator::Ne => Expression::Ne(value.to_json()),
        Operator::Gt => Expression::Gt(value.to_json()),
        Operator::Gte => Expression::Gte(value.to_json()),
        Operator::Lt => Expression::Lt(value.to_json()),
        Operator::Lte => Expression::Lte(value.to_json()),
        Operator::In => Expression::In(value.to_json()),
        Operator::NotIn => Expression::NotIn(value.to_json()),
        Operator::Like => contains(value, false),
        Operator::ILike => contains(value, true),
        Operator::Exists => Expression::Exists(value.to_json()),
        Operator::IsNull => {
            if is_truthy(value) {
                return None;
            }
            Expression::Ne(JsonValue::Null)
        }
    };
    Some(expression)
}

/// Substring match expression
///
/// The value is inserted into the pattern verbatim.
pub fn contains(value: &FilterValue, case_insensitive: bool) -> Expression {
    Expression::Regex {
        pattern: format!(".*{}.*", value.to_text()),
        case_insensitive,
    }
}

fn is_truthy(value: &FilterValue) -> bool {
    match value {
        FilterValue::Bool(b) => *b,
        FilterValue::List(items) => !items.is_empty(),
        FilterValue::SubFilter(sub) => !sub.is_empty(),
        FilterValue::Scalar(scalar) => match scalar {
            JsonValue::Null => false,
            JsonValue::Bool(b) => *b,
            JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            JsonValue::String(s) => !s.is_empty(),
            JsonValue::Array(items) => !items.is_empty(),
            JsonValue::Object(map) => !map.is_empty(),
        },
    }
}
