//! Todo (activity) model, status, and partial-update patch.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::{DbId, IsoTimestamp};

/// Kind discriminator for scheduled activities, the common todo kind.
pub const KIND_ACTIVITY: &str = "Activity";

/// Lifecycle status of a todo.
///
/// Transitions are not enforced in this layer; any status may be
/// written by an update and the server keeps its own rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    Overdue,
}

impl TodoStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::Completed => "completed",
            TodoStatus::Cancelled => "cancelled",
            TodoStatus::Overdue => "overdue",
        }
    }

    /// Parse from a wire string, defaulting to `Pending` for unknown values.
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => TodoStatus::Completed,
            "cancelled" => TodoStatus::Cancelled,
            "overdue" => TodoStatus::Overdue,
            _ => TodoStatus::Pending,
        }
    }
}

/// A scheduled follow-up action tied to a lead.
///
/// `lead_id` is a best-effort foreign key; the store filters by it but
/// does not enforce referential integrity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: DbId,
    pub lead_id: DbId,
    /// Discriminates activities from other todo kinds.
    pub kind: String,
    pub description: String,
    /// Filled in when the task is resolved.
    pub response_note: String,
    pub status: TodoStatus,
    pub scheduled_at: IsoTimestamp,
    pub participants: Vec<String>,
    pub created_at: IsoTimestamp,
    pub updated_at: IsoTimestamp,
}

impl Todo {
    /// Look up a field by name for client-side filter evaluation.
    ///
    /// Unknown fields yield `Null`, which no predicate matches.
    pub fn field_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "lead_id" => json!(self.lead_id),
            "kind" | "type" => json!(self.kind),
            "description" => json!(self.description),
            "response_note" => json!(self.response_note),
            "status" => json!(self.status.as_str()),
            "scheduled_at" => json!(self.scheduled_at),
            "participants" => json!(self.participants),
            _ => Value::Null,
        }
    }
}

/// Partial set of todo fields for create and update operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub lead_id: Option<DbId>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub response_note: Option<String>,
    pub status: Option<TodoStatus>,
    pub scheduled_at: Option<IsoTimestamp>,
    pub participants: Option<Vec<String>>,
}

impl TodoPatch {
    /// Whether the patch supplies no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Retain only the fields that actually differ from `todo`.
    pub fn changes_against(&self, todo: &Todo) -> TodoPatch {
        TodoPatch {
            lead_id: keep_if_differs(self.lead_id, todo.lead_id),
            kind: self
                .kind
                .clone()
                .filter(|v| *v != todo.kind),
            description: self
                .description
                .clone()
                .filter(|v| *v != todo.description),
            response_note: self
                .response_note
                .clone()
                .filter(|v| *v != todo.response_note),
            status: keep_if_differs(self.status, todo.status),
            scheduled_at: self
                .scheduled_at
                .clone()
                .filter(|v| *v != todo.scheduled_at),
            participants: self
                .participants
                .clone()
                .filter(|v| serde_json::to_string(v).unwrap_or_default()
                    != serde_json::to_string(&todo.participants).unwrap_or_default()),
        }
    }

    /// Merge the supplied fields into `todo`, leaving absent ones alone.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(v) = self.lead_id {
            todo.lead_id = v;
        }
        if let Some(v) = &self.kind {
            todo.kind = v.clone();
        }
        if let Some(v) = &self.description {
            todo.description = v.clone();
        }
        if let Some(v) = &self.response_note {
            todo.response_note = v.clone();
        }
        if let Some(v) = self.status {
            todo.status = v;
        }
        if let Some(v) = &self.scheduled_at {
            todo.scheduled_at = v.clone();
        }
        if let Some(v) = &self.participants {
            todo.participants = v.clone();
        }
    }
}

fn keep_if_differs<T: PartialEq + Copy>(candidate: Option<T>, current: T) -> Option<T> {
    candidate.filter(|v| *v != current)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
