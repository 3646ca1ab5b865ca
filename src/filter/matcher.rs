use std::cmp::Ordering;

use serde_json::Value;

use super::types::{Condition, FilterOp, FilterWhereInfo};

/// Ordering between two JSON scalars of the same kind; `None` when incomparable
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// JSON equality where `3` and `3.0` are the same number, as in jsonb
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_values(a, b) == Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r)),
        _ => a == b,
    }
}

impl Condition {
    /// Evaluates the condition against a document the same way the SQL compiler would
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Condition::And(parts) => parts.iter().all(|c| c.matches(doc)),
            Condition::Or(parts) => parts.iter().any(|c| c.matches(doc)),
            Condition::Not(inner) => !inner.matches(doc),
            Condition::Field(info) => field_matches(info, doc),
        }
    }
}

fn field_matches(info: &FilterWhereInfo, doc: &Value) -> bool {
    let field = doc.get(&info.column).filter(|v| !v.is_null());
    let data = &info.data;

    match info.operator {
        FilterOp::Eq => match field {
            None => data.is_null(),
            Some(v) => values_equal(v, data),
        },
        FilterOp::Ne => match field {
            None => !data.is_null(),
            Some(v) => !values_equal(v, data),
        },
        FilterOp::Gt => ordered(field, data, |o| o == Ordering::Greater),
        FilterOp::Gte => ordered(field, data, |o| o != Ordering::Less),
        FilterOp::Lt => ordered(field, data, |o| o == Ordering::Less),
        FilterOp::Lte => ordered(field, data, |o| o != Ordering::Greater),
        FilterOp::In => match (field, data.as_array()) {
            (Some(v), Some(values)) => values.iter().any(|candidate| values_equal(v, candidate)),
            _ => false,
        },
        FilterOp::NIn => match (field, data.as_array()) {
            (Some(v), Some(values)) => !values.iter().any(|candidate| values_equal(v, candidate)),
            (None, _) => true,
            (Some(_), None) => false,
        },
        FilterOp::Contains => match field {
            Some(Value::Array(items)) => items.iter().any(|item| values_equal(item, data)),
            _ => false,
        },
    }
}

fn ordered(field: Option<&Value>, data: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    field
        .and_then(|v| compare_values(v, data))
        .map(accept)
        .unwrap_or(false)
}
