//! Translation of a [`LeadQuery`] into wire query parameters.

use leadline_core::filter::{FilterOp, FilterOption};
use leadline_core::options::{OptionSet, PRIORITIES, SOURCES, STAGES};
use leadline_core::query::LeadQuery;
use serde_json::Value;

/// Build the query-parameter list for a paged read.
///
/// Enumerated filter values map to their wire values, budget bounds
/// become `min_budget`/`max_budget`, the pipeline flag becomes
/// `pipeline`, and every other filter passes through under its own
/// field name. An empty search is omitted entirely.
pub fn read_params(resource: &str, query: &LeadQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("resource".to_string(), resource.to_string()),
        ("page".to_string(), query.page.to_string()),
        ("per_page".to_string(), query.per_page.to_string()),
        ("sort_by".to_string(), query.sort_by.clone()),
        ("sort_dir".to_string(), query.sort_dir.as_str().to_string()),
    ];

    if !query.search.is_empty() {
        params.push(("search".to_string(), query.search.clone()));
    }

    for filter in &query.filters {
        if let Some(pair) = filter_param(filter) {
            params.push(pair);
        }
    }

    params
}

/// Map one filter to its wire parameter, or `None` for values that
/// cannot be expressed (null).
fn filter_param(filter: &FilterOption) -> Option<(String, String)> {
    match (filter.field.as_str(), filter.op) {
        ("stage", _) => Some(("stage".to_string(), catalog_text(&STAGES, &filter.value)?)),
        ("priority", _) => Some((
            "priority".to_string(),
            catalog_text(&PRIORITIES, &filter.value)?,
        )),
        ("source", _) => Some(("source".to_string(), catalog_text(&SOURCES, &filter.value)?)),
        ("budget", FilterOp::Gte) => Some(("min_budget".to_string(), plain_text(&filter.value)?)),
        ("budget", FilterOp::Lte) => Some(("max_budget".to_string(), plain_text(&filter.value)?)),
        ("in_pipeline", _) | ("pipeline", _) => {
            Some(("pipeline".to_string(), plain_text(&filter.value)?))
        }
        (field, _) => Some((field.to_string(), plain_text(&filter.value)?)),
    }
}

/// Render a filter value as parameter text, mapping each element of an
/// enumerated field through its catalog. Lists join with commas.
fn catalog_text(set: &OptionSet, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(set.to_wire(s).to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => set.to_wire(s).to_string(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Render a filter value as parameter text without catalog mapping.
fn plain_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
