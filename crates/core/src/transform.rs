//! Wire-record to domain-model transformation.
//!
//! The API serves records as loose JSON whose field types wobble across
//! backend versions: numbers arrive as strings, lists as comma-joined
//! text, custom fields as an embedded JSON string. Every function here
//! is total -- malformed input produces a best-effort record with
//! documented defaults, never an error.

use serde_json::{json, Map, Value};

use crate::lead::{Lead, LeadPatch};
use crate::options::{PRIORITIES, SOURCES, STAGES};
use crate::todo::{Todo, TodoPatch, TodoStatus, KIND_ACTIVITY};

// ---------------------------------------------------------------------------
// Wire schema generations
// ---------------------------------------------------------------------------

/// Which generation of wire field names a record uses.
///
/// The backend is partway through a schema migration. `Legacy` covers
/// the old contact shape (`lead_name`, `mobile`, `alternate_mobile`,
/// `lead_source`); `Current` the new one. One transformer handles both,
/// keyed by this tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireSchema {
    Legacy,
    #[default]
    Current,
}

impl WireSchema {
    fn name_key(self) -> &'static str {
        match self {
            WireSchema::Legacy => "lead_name",
            WireSchema::Current => "name",
        }
    }

    fn phone_key(self) -> &'static str {
        match self {
            WireSchema::Legacy => "mobile",
            WireSchema::Current => "phone",
        }
    }

    fn alt_phone_key(self) -> &'static str {
        match self {
            WireSchema::Legacy => "alternate_mobile",
            WireSchema::Current => "alt_phone",
        }
    }

    fn source_key(self) -> &'static str {
        match self {
            WireSchema::Legacy => "lead_source",
            WireSchema::Current => "source",
        }
    }
}

// ---------------------------------------------------------------------------
// Field coercion helpers
// ---------------------------------------------------------------------------

/// Text field: accepts strings, numbers, and bools; defaults to `""`.
fn text(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Integer field: accepts numbers and numeric text; defaults to 0.
fn int(raw: &Value, key: &str) -> i64 {
    match raw.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Float field: accepts numbers and numeric text; defaults to 0.0.
fn float(raw: &Value, key: &str) -> f64 {
    match raw.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Boolean flag: accepts bools, 0/1 numbers, and "1"/"true" text.
fn flag(raw: &Value, key: &str) -> bool {
    match raw.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().map(|v| v != 0).unwrap_or(false),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"),
        _ => false,
    }
}

/// List field: a JSON array of strings or a comma-joined string; empty
/// or absent input yields an empty list, never null.
fn list(raw: &Value, key: &str) -> Vec<String> {
    match raw.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => split_joined(s),
        _ => Vec::new(),
    }
}

/// Split a comma-joined wire string, dropping empty segments.
pub fn split_joined(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fallback policy for embedded custom-field JSON.
///
/// A JSON object is taken as-is; a string is parsed as JSON; anything
/// malformed, non-object, or absent becomes the empty map. Parse
/// failures never propagate.
pub fn custom_fields_or_empty(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => Map::new(),
        },
        _ => Map::new(),
    }
}

// ---------------------------------------------------------------------------
// Wire -> domain
// ---------------------------------------------------------------------------

/// Build a [`Lead`] from a raw wire record.
///
/// Total for any input: missing or mistyped fields coerce to their
/// defaults, and enumerated fields route through the catalog fallbacks.
pub fn lead_from_wire(schema: WireSchema, raw: &Value) -> Lead {
    Lead {
        id: int(raw, "id"),
        in_pipeline: flag(raw, "pipeline"),
        name: text(raw, schema.name_key()),
        phone: text(raw, schema.phone_key()),
        alt_phone: text(raw, schema.alt_phone_key()),
        address: text(raw, "address"),
        labels: list(raw, "labels"),
        stage: STAGES.from_wire(&text(raw, "stage")).to_string(),
        priority: PRIORITIES.from_wire(&text(raw, "priority")).to_string(),
        requirement: text(raw, "requirement"),
        budget: float(raw, "budget"),
        about: text(raw, "about"),
        list_name: text(raw, "list_name"),
        source: SOURCES.from_wire(&text(raw, schema.source_key())).to_string(),
        custom_fields: custom_fields_or_empty(raw.get("custom_fields")),
        property_type: text(raw, "property_type"),
        assigned_to: text(raw, "assigned_to"),
        admin_id: int(raw, "admin_id"),
        email: text(raw, "email"),
        score: int(raw, "score"),
        last_note: text(raw, "last_note"),
        created_at: text(raw, "created_at"),
        updated_at: text(raw, "updated_at"),
    }
}

/// Build a [`Todo`] from a raw wire record.
///
/// Same totality contract as [`lead_from_wire`]. A missing kind
/// defaults to [`KIND_ACTIVITY`].
pub fn todo_from_wire(raw: &Value) -> Todo {
    let kind = text(raw, "type");
    Todo {
        id: int(raw, "id"),
        lead_id: int(raw, "lead_id"),
        kind: if kind.is_empty() {
            KIND_ACTIVITY.to_string()
        } else {
            kind
        },
        description: text(raw, "description"),
        response_note: text(raw, "response_note"),
        status: TodoStatus::from_wire(&text(raw, "status")),
        scheduled_at: text(raw, "scheduled_at"),
        participants: list(raw, "participants"),
        created_at: text(raw, "created_at"),
        updated_at: text(raw, "updated_at"),
    }
}

// ---------------------------------------------------------------------------
// Domain -> wire
// ---------------------------------------------------------------------------

/// Translate a lead patch to wire names and values (current schema).
///
/// Only supplied fields are emitted. Lists are re-joined with commas
/// and enumerated fields mapped back to their wire values, mirroring
/// what the transformer undoes on the way in.
pub fn lead_patch_to_wire(patch: &LeadPatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(v) = patch.in_pipeline {
        body.insert("pipeline".to_string(), Value::Bool(v));
    }
    if let Some(v) = &patch.name {
        body.insert("name".to_string(), json!(v));
    }
    if let Some(v) = &patch.phone {
        body.insert("phone".to_string(), json!(v));
    }
    if let Some(v) = &patch.alt_phone {
        body.insert("alt_phone".to_string(), json!(v));
    }
    if let Some(v) = &patch.address {
        body.insert("address".to_string(), json!(v));
    }
    if let Some(v) = &patch.labels {
        body.insert("labels".to_string(), json!(v.join(",")));
    }
    if let Some(v) = &patch.stage {
        body.insert("stage".to_string(), json!(STAGES.to_wire(v)));
    }
    if let Some(v) = &patch.priority {
        body.insert("priority".to_string(), json!(PRIORITIES.to_wire(v)));
    }
    if let Some(v) = &patch.requirement {
        body.insert("requirement".to_string(), json!(v));
    }
    if let Some(v) = patch.budget {
        body.insert("budget".to_string(), json!(v));
    }
    if let Some(v) = &patch.about {
        body.insert("about".to_string(), json!(v));
    }
    if let Some(v) = &patch.list_name {
        body.insert("list_name".to_string(), json!(v));
    }
    if let Some(v) = &patch.source {
        body.insert("source".to_string(), json!(SOURCES.to_wire(v)));
    }
    if let Some(v) = &patch.custom_fields {
        let serialized = serde_json::to_string(v).unwrap_or_else(|_| "{}".to_string());
        body.insert("custom_fields".to_string(), json!(serialized));
    }
    if let Some(v) = &patch.property_type {
        body.insert("property_type".to_string(), json!(v));
    }
    if let Some(v) = &patch.assigned_to {
        body.insert("assigned_to".to_string(), json!(v));
    }
    if let Some(v) = patch.admin_id {
        body.insert("admin_id".to_string(), json!(v));
    }
    if let Some(v) = &patch.email {
        body.insert("email".to_string(), json!(v));
    }
    if let Some(v) = patch.score {
        body.insert("score".to_string(), json!(v));
    }
    if let Some(v) = &patch.last_note {
        body.insert("last_note".to_string(), json!(v));
    }
    body
}

/// Translate a todo patch to wire names and values.
pub fn todo_patch_to_wire(patch: &TodoPatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(v) = patch.lead_id {
        body.insert("lead_id".to_string(), json!(v));
    }
    if let Some(v) = &patch.kind {
        body.insert("type".to_string(), json!(v));
    }
    if let Some(v) = &patch.description {
        body.insert("description".to_string(), json!(v));
    }
    if let Some(v) = &patch.response_note {
        body.insert("response_note".to_string(), json!(v));
    }
    if let Some(v) = patch.status {
        body.insert("status".to_string(), json!(v.as_str()));
    }
    if let Some(v) = &patch.scheduled_at {
        body.insert("scheduled_at".to_string(), json!(v));
    }
    if let Some(v) = &patch.participants {
        body.insert("participants".to_string(), json!(v.join(",")));
    }
    body
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_from_empty_object_is_fully_defaulted() {
        let lead = lead_from_wire(WireSchema::Current, &json!({}));
        assert_eq!(lead.id, 0);
        assert_eq!(lead.name, "");
        assert_eq!(lead.budget, 0.0);
        assert!(lead.labels.is_empty());
        assert!(lead.custom_fields.is_empty());
        assert_eq!(lead.stage, "Fresh Lead");
        assert_eq!(lead.priority, "General");
        assert_eq!(lead.source, "Other");
    }

    #[test]
    fn lead_from_non_object_does_not_panic() {
        for raw in [json!(null), json!("garbage"), json!([1, 2, 3]), json!(42)] {
            let lead = lead_from_wire(WireSchema::Current, &raw);
            assert_eq!(lead.id, 0);
        }
    }

    #[test]
    fn numeric_text_is_coerced() {
        let raw = json!({"id": "42", "budget": "125000.50", "score": "9"});
        let lead = lead_from_wire(WireSchema::Current, &raw);
        assert_eq!(lead.id, 42);
        assert_eq!(lead.budget, 125000.50);
        assert_eq!(lead.score, 9);
    }

    #[test]
    fn unparsable_numbers_default_to_zero() {
        let raw = json!({"id": "n/a", "budget": "TBD"});
        let lead = lead_from_wire(WireSchema::Current, &raw);
        assert_eq!(lead.id, 0);
        assert_eq!(lead.budget, 0.0);
    }

    #[test]
    fn comma_joined_labels_are_split_and_trimmed() {
        let raw = json!({"labels": "vip, repeat ,, hot-zone"});
        let lead = lead_from_wire(WireSchema::Current, &raw);
        assert_eq!(lead.labels, vec!["vip", "repeat", "hot-zone"]);
    }

    #[test]
    fn label_array_is_accepted_too() {
        let raw = json!({"labels": ["vip", " repeat "]});
        let lead = lead_from_wire(WireSchema::Current, &raw);
        assert_eq!(lead.labels, vec!["vip", "repeat"]);
    }

    #[test]
    fn custom_fields_string_blob_is_parsed() {
        let raw = json!({"custom_fields": r#"{"floor": "3", "parking": true}"#});
        let lead = lead_from_wire(WireSchema::Current, &raw);
        assert_eq!(lead.custom_fields["floor"], "3");
        assert_eq!(lead.custom_fields["parking"], true);
    }

    #[test]
    fn malformed_custom_fields_fall_back_to_empty() {
        for blob in [json!("{not json"), json!("[1,2]"), json!(7), json!(null)] {
            let raw = json!({ "custom_fields": blob });
            let lead = lead_from_wire(WireSchema::Current, &raw);
            assert!(lead.custom_fields.is_empty());
        }
    }

    #[test]
    fn unknown_stage_coerces_to_fallback() {
        let raw = json!({"stage": "on_hold"});
        let lead = lead_from_wire(WireSchema::Current, &raw);
        assert_eq!(lead.stage, "Fresh Lead");
    }

    #[test]
    fn legacy_schema_reads_old_field_names() {
        let raw = json!({
            "lead_name": "Asha Verma",
            "mobile": "9999999999",
            "alternate_mobile": "8888888888",
            "lead_source": "referral",
        });
        let lead = lead_from_wire(WireSchema::Legacy, &raw);
        assert_eq!(lead.name, "Asha Verma");
        assert_eq!(lead.phone, "9999999999");
        assert_eq!(lead.alt_phone, "8888888888");
        assert_eq!(lead.source, "Referral");

        // The same record through the current schema misses those fields.
        let lead = lead_from_wire(WireSchema::Current, &raw);
        assert_eq!(lead.name, "");
        assert_eq!(lead.source, "Other");
    }

    #[test]
    fn pipeline_flag_accepts_wire_variants() {
        for truthy in [json!(true), json!(1), json!("1"), json!("true")] {
            let raw = json!({ "pipeline": truthy });
            assert!(lead_from_wire(WireSchema::Current, &raw).in_pipeline);
        }
        for falsy in [json!(false), json!(0), json!("0"), json!("no")] {
            let raw = json!({ "pipeline": falsy });
            assert!(!lead_from_wire(WireSchema::Current, &raw).in_pipeline);
        }
    }

    #[test]
    fn todo_from_wire_defaults_and_splits() {
        let raw = json!({
            "id": "3",
            "lead_id": 7,
            "status": "OVERDUE",
            "participants": "4,12",
        });
        let todo = todo_from_wire(&raw);
        assert_eq!(todo.id, 3);
        assert_eq!(todo.lead_id, 7);
        assert_eq!(todo.kind, KIND_ACTIVITY);
        assert_eq!(todo.status, TodoStatus::Overdue);
        assert_eq!(todo.participants, vec!["4", "12"]);
        assert_eq!(todo.description, "");
    }

    #[test]
    fn lead_patch_emits_only_supplied_fields_in_wire_form() {
        let patch = LeadPatch {
            stage: Some("Closed Won".to_string()),
            labels: Some(vec!["vip".to_string(), "repeat".to_string()]),
            budget: Some(500_000.0),
            ..Default::default()
        };
        let body = lead_patch_to_wire(&patch);
        assert_eq!(body.len(), 3);
        assert_eq!(body["stage"], "won");
        assert_eq!(body["labels"], "vip,repeat");
        assert_eq!(body["budget"], 500_000.0);
    }

    #[test]
    fn lead_patch_serializes_custom_fields_as_blob() {
        let mut fields = Map::new();
        fields.insert("floor".to_string(), json!("3"));
        let patch = LeadPatch {
            custom_fields: Some(fields),
            ..Default::default()
        };
        let body = lead_patch_to_wire(&patch);
        assert_eq!(body["custom_fields"], r#"{"floor":"3"}"#);
    }

    #[test]
    fn todo_patch_maps_kind_and_status() {
        let patch = TodoPatch {
            kind: Some(KIND_ACTIVITY.to_string()),
            status: Some(TodoStatus::Completed),
            participants: Some(vec!["4".to_string(), "12".to_string()]),
            ..Default::default()
        };
        let body = todo_patch_to_wire(&patch);
        assert_eq!(body["type"], KIND_ACTIVITY);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["participants"], "4,12");
    }
}
