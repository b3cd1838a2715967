//! Lead model and partial-update patch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{DbId, IsoTimestamp};

/// A prospective customer tracked through the sales pipeline.
///
/// Optional text is normalized to `""` and list/map fields to empty
/// collections so UI form bindings never see a null. `created_at` /
/// `updated_at` are server-authoritative ISO strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: DbId,
    /// Whether the lead participates in the active pipeline view.
    pub in_pipeline: bool,
    pub name: String,
    pub phone: String,
    pub alt_phone: String,
    pub address: String,
    /// Free-text labels; order is not meaningful.
    pub labels: Vec<String>,
    /// Always a member of [`crate::options::STAGES`] after transformation.
    pub stage: String,
    /// Always a member of [`crate::options::PRIORITIES`] after transformation.
    pub priority: String,
    pub requirement: String,
    pub budget: f64,
    pub about: String,
    pub list_name: String,
    /// Always a member of [`crate::options::SOURCES`] after transformation.
    pub source: String,
    /// Open-ended custom fields; empty map when absent or unparsable.
    pub custom_fields: Map<String, Value>,
    pub property_type: String,
    pub assigned_to: String,
    pub admin_id: DbId,
    pub email: String,
    pub score: i64,
    pub last_note: String,
    pub created_at: IsoTimestamp,
    pub updated_at: IsoTimestamp,
}

/// Partial set of lead fields for create and update operations.
///
/// `None` means "not supplied". Update operations transmit only the
/// fields that differ from the last known server copy -- see
/// [`LeadPatch::changes_against`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub in_pipeline: Option<bool>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub alt_phone: Option<String>,
    pub address: Option<String>,
    pub labels: Option<Vec<String>>,
    pub stage: Option<String>,
    pub priority: Option<String>,
    pub requirement: Option<String>,
    pub budget: Option<f64>,
    pub about: Option<String>,
    pub list_name: Option<String>,
    pub source: Option<String>,
    pub custom_fields: Option<Map<String, Value>>,
    pub property_type: Option<String>,
    pub assigned_to: Option<String>,
    pub admin_id: Option<DbId>,
    pub email: Option<String>,
    pub score: Option<i64>,
    pub last_note: Option<String>,
}

impl LeadPatch {
    /// Whether the patch supplies no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Retain only the fields that actually differ from `lead`.
    ///
    /// Scalars compare by equality; list and map fields by serialized
    /// equality, so element order still counts as a change.
    pub fn changes_against(&self, lead: &Lead) -> LeadPatch {
        LeadPatch {
            in_pipeline: diff(&self.in_pipeline, &lead.in_pipeline),
            name: diff(&self.name, &lead.name),
            phone: diff(&self.phone, &lead.phone),
            alt_phone: diff(&self.alt_phone, &lead.alt_phone),
            address: diff(&self.address, &lead.address),
            labels: diff_serialized(&self.labels, &lead.labels),
            stage: diff(&self.stage, &lead.stage),
            priority: diff(&self.priority, &lead.priority),
            requirement: diff(&self.requirement, &lead.requirement),
            budget: diff(&self.budget, &lead.budget),
            about: diff(&self.about, &lead.about),
            list_name: diff(&self.list_name, &lead.list_name),
            source: diff(&self.source, &lead.source),
            custom_fields: diff_serialized(&self.custom_fields, &lead.custom_fields),
            property_type: diff(&self.property_type, &lead.property_type),
            assigned_to: diff(&self.assigned_to, &lead.assigned_to),
            admin_id: diff(&self.admin_id, &lead.admin_id),
            email: diff(&self.email, &lead.email),
            score: diff(&self.score, &lead.score),
            last_note: diff(&self.last_note, &lead.last_note),
        }
    }

    /// Merge the supplied fields into `lead`, leaving absent ones alone.
    ///
    /// Timestamps are the caller's concern; this touches data fields only.
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(v) = self.in_pipeline {
            lead.in_pipeline = v;
        }
        if let Some(v) = &self.name {
            lead.name = v.clone();
        }
        if let Some(v) = &self.phone {
            lead.phone = v.clone();
        }
        if let Some(v) = &self.alt_phone {
            lead.alt_phone = v.clone();
        }
        if let Some(v) = &self.address {
            lead.address = v.clone();
        }
        if let Some(v) = &self.labels {
            lead.labels = v.clone();
        }
        if let Some(v) = &self.stage {
            lead.stage = v.clone();
        }
        if let Some(v) = &self.priority {
            lead.priority = v.clone();
        }
        if let Some(v) = &self.requirement {
            lead.requirement = v.clone();
        }
        if let Some(v) = self.budget {
            lead.budget = v;
        }
        if let Some(v) = &self.about {
            lead.about = v.clone();
        }
        if let Some(v) = &self.list_name {
            lead.list_name = v.clone();
        }
        if let Some(v) = &self.source {
            lead.source = v.clone();
        }
        if let Some(v) = &self.custom_fields {
            lead.custom_fields = v.clone();
        }
        if let Some(v) = &self.property_type {
            lead.property_type = v.clone();
        }
        if let Some(v) = &self.assigned_to {
            lead.assigned_to = v.clone();
        }
        if let Some(v) = self.admin_id {
            lead.admin_id = v;
        }
        if let Some(v) = &self.email {
            lead.email = v.clone();
        }
        if let Some(v) = self.score {
            lead.score = v;
        }
        if let Some(v) = &self.last_note {
            lead.last_note = v.clone();
        }
    }
}

/// Supplied-and-different for scalar fields.
fn diff<T: PartialEq + Clone>(candidate: &Option<T>, current: &T) -> Option<T> {
    match candidate {
        Some(v) if v != current => Some(v.clone()),
        _ => None,
    }
}

/// Supplied-and-different for list/map fields, compared in serialized form.
fn diff_serialized<T: Serialize + Clone>(candidate: &Option<T>, current: &T) -> Option<T> {
    match candidate {
        Some(v) if to_json(v) != to_json(current) => Some(v.clone()),
        _ => None,
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lead() -> Lead {
        Lead {
            id: 7,
            name: "Asha Verma".to_string(),
            phone: "9999999999".to_string(),
            labels: vec!["vip".to_string(), "repeat".to_string()],
            stage: "Contacted".to_string(),
            priority: "Warm".to_string(),
            budget: 450_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(LeadPatch::default().is_empty());
        let patch = LeadPatch {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn unchanged_fields_are_dropped() {
        let lead = sample_lead();
        let patch = LeadPatch {
            name: Some("Asha Verma".to_string()),
            phone: Some("9999999999".to_string()),
            labels: Some(vec!["vip".to_string(), "repeat".to_string()]),
            budget: Some(450_000.0),
            ..Default::default()
        };
        assert!(patch.changes_against(&lead).is_empty());
    }

    #[test]
    fn changed_fields_are_kept() {
        let lead = sample_lead();
        let patch = LeadPatch {
            name: Some("Asha Verma".to_string()),
            stage: Some("Negotiation".to_string()),
            budget: Some(500_000.0),
            ..Default::default()
        };
        let changes = patch.changes_against(&lead);
        assert_eq!(changes.name, None);
        assert_eq!(changes.stage.as_deref(), Some("Negotiation"));
        assert_eq!(changes.budget, Some(500_000.0));
    }

    #[test]
    fn reordered_labels_count_as_a_change() {
        let lead = sample_lead();
        let patch = LeadPatch {
            labels: Some(vec!["repeat".to_string(), "vip".to_string()]),
            ..Default::default()
        };
        assert!(!patch.changes_against(&lead).is_empty());
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let mut lead = sample_lead();
        let patch = LeadPatch {
            stage: Some("Site Visit".to_string()),
            score: Some(80),
            ..Default::default()
        };
        patch.apply_to(&mut lead);
        assert_eq!(lead.stage, "Site Visit");
        assert_eq!(lead.score, 80);
        assert_eq!(lead.name, "Asha Verma");
        assert_eq!(lead.budget, 450_000.0);
    }
}
