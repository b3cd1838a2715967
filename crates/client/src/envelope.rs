//! Typed response envelopes for the CRM endpoints.

use leadline_core::types::DbId;
use serde::Deserialize;
use serde_json::Value;

/// Envelope for paged reads: `{ success, data, meta: { total }, message? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pagination metadata attached to read responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub total: i64,
}

/// Envelope for writes: `{ success, id?, message? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteEnvelope {
    pub success: bool,
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One page of raw records plus the server's total count.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub data: Vec<Value>,
    pub total: i64,
}

/// Option catalog served by the read-only catalog endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tags: Vec<String>,
    /// Assignable owners; shape is backend-defined and passed through.
    #[serde(default)]
    pub assigned_to: Vec<Value>,
    #[serde(default)]
    pub lists: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
