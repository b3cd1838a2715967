//! The collaborator seam between the state store and the network.

use async_trait::async_trait;
use leadline_core::query::LeadQuery;
use leadline_core::types::DbId;
use serde_json::{Map, Value};

use crate::api::CrmApiError;
use crate::envelope::{Catalog, RecordPage};

/// Logical resource name for lead records.
pub const RESOURCE_CONTACTS: &str = "contacts";

/// Logical resource name for todo/activity records.
pub const RESOURCE_ACTIVITIES: &str = "activities";

/// Remote CRM operations the store depends on.
///
/// Implemented by [`crate::api::CrmApi`] over HTTP and by in-memory
/// fakes in store tests.
#[async_trait]
pub trait RemoteCrm: Send + Sync {
    /// Fetch one page of raw records for a resource.
    async fn fetch_page(
        &self,
        resource: &str,
        query: &LeadQuery,
    ) -> Result<RecordPage, CrmApiError>;

    /// Fetch a single record; absence is `Ok(None)`, not an error.
    async fn fetch_one(&self, resource: &str, id: DbId) -> Result<Option<Value>, CrmApiError>;

    /// Create a record; returns the server-assigned id.
    async fn create(&self, resource: &str, body: Map<String, Value>) -> Result<DbId, CrmApiError>;

    /// Partially update a record with the supplied wire fields.
    async fn update(
        &self,
        resource: &str,
        id: DbId,
        body: Map<String, Value>,
    ) -> Result<(), CrmApiError>;

    /// Permanently delete a record.
    async fn delete(&self, resource: &str, id: DbId) -> Result<(), CrmApiError>;

    /// Fetch the option catalog (tags, assignable owners, named lists).
    async fn fetch_catalog(&self) -> Result<Catalog, CrmApiError>;
}
