//! Lead query parameters and canonical request keys.

use serde::{Deserialize, Serialize};

use crate::filter::FilterOption;

/// Default number of leads per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of leads per page accepted from callers.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Parameters for one paged lead listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadQuery {
    pub page: i64,
    pub per_page: i64,
    pub sort_by: String,
    pub sort_dir: SortDir,
    /// Free-text search; empty means no search.
    pub search: String,
    pub filters: Vec<FilterOption>,
}

impl Default for LeadQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            sort_by: "updated_at".to_string(),
            sort_dir: SortDir::Desc,
            search: String::new(),
            filters: Vec::new(),
        }
    }
}

impl LeadQuery {
    /// Clamp a caller-provided page number to valid bounds.
    pub fn clamp_page(page: Option<i64>) -> i64 {
        page.unwrap_or(1).max(1)
    }

    /// Clamp a caller-provided page size to valid bounds.
    pub fn clamp_per_page(per_page: Option<i64>) -> i64 {
        per_page.unwrap_or(DEFAULT_PAGE_SIZE).max(1).min(MAX_PAGE_SIZE)
    }

    /// Canonical cache key for this query.
    ///
    /// Filter fragments are sorted so two queries differing only in
    /// filter order share a key; every other parameter difference
    /// produces a distinct key.
    pub fn cache_key(&self) -> String {
        let mut fragments: Vec<String> =
            self.filters.iter().map(FilterOption::key_fragment).collect();
        fragments.sort();
        format!(
            "page={}&per_page={}&sort_by={}&sort_dir={}&search={}&filters=[{}]",
            self.page,
            self.per_page,
            self.sort_by,
            self.sort_dir.as_str(),
            self.search,
            fragments.join("|"),
        )
    }

    /// Deterministic key identifying one logical remote request.
    ///
    /// Concurrent calls with the same key collapse to a single network
    /// call; any differing sort/page/filter value must produce a
    /// different key.
    pub fn dedupe_key(&self, resource: &str) -> String {
        format!("{resource}?{}", self.cache_key())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
