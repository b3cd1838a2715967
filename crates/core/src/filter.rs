//! Filter predicates evaluated client-side.
//!
//! Filters are held as an ordered list (removal is by index) and may
//! repeat. Lead filtering happens server-side via query parameters;
//! these predicates run locally against the todo collection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::todo::Todo;

/// Comparison operator for a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Contains,
    Gte,
    Lte,
}

impl FilterOp {
    /// Canonical text form, used in cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Contains => "contains",
            FilterOp::Gte => "gte",
            FilterOp::Lte => "lte",
        }
    }
}

/// A single predicate: field name, operator, and a scalar or list value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl FilterOption {
    pub fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Canonical text form used in cache and dedupe keys.
    pub fn key_fragment(&self) -> String {
        format!("{}:{}:{}", self.field, self.op.as_str(), self.value)
    }

    /// Evaluate this predicate against one todo.
    pub fn matches_todo(&self, todo: &Todo) -> bool {
        self.matches(&todo.field_value(&self.field))
    }

    /// Evaluate this predicate against a candidate value.
    ///
    /// - `Eq` with a list on either side tests set membership.
    /// - `Contains` is a case-insensitive substring test; against a list
    ///   candidate it matches when any element contains the needle.
    /// - `Gte`/`Lte` compare numerically, coercing numeric text.
    /// - `Null` candidates (unknown fields) never match.
    pub fn matches(&self, candidate: &Value) -> bool {
        if candidate.is_null() {
            return false;
        }
        match self.op {
            FilterOp::Eq => match (&self.value, candidate) {
                (Value::Array(options), c) => options.iter().any(|v| loosely_equal(v, c)),
                (v, Value::Array(items)) => items.iter().any(|c| loosely_equal(v, c)),
                (v, c) => loosely_equal(v, c),
            },
            FilterOp::Contains => {
                let needle = text_of(&self.value).to_lowercase();
                match candidate {
                    Value::Array(items) => items
                        .iter()
                        .any(|v| text_of(v).to_lowercase().contains(&needle)),
                    other => text_of(other).to_lowercase().contains(&needle),
                }
            }
            FilterOp::Gte => match (number_of(candidate), number_of(&self.value)) {
                (Some(c), Some(bound)) => c >= bound,
                _ => false,
            },
            FilterOp::Lte => match (number_of(candidate), number_of(&self.value)) {
                (Some(c), Some(bound)) => c <= bound,
                _ => false,
            },
        }
    }
}

/// Loose equality: two numerically-coercible values compare as numbers,
/// everything else by its text form.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (number_of(a), number_of(b)) {
        return x == y;
    }
    text_of(a) == text_of(b)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
