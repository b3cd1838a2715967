//! Central state store for leads, todos, filters, and selection.
//!
//! [`LeadStore`] is the single authority over the in-memory collections
//! UI layers read. It is created once at application start and shared
//! via `Arc`; every remote effect goes through the injected
//! [`RemoteCrm`] collaborator, so tests run it against an in-memory
//! fake.
//!
//! Completion order between independent operations is not guaranteed.
//! Read completions overwrite their slice of state last-write-wins, and
//! a caller that needs strict ordering awaits one operation before
//! issuing the next. Within one request key, concurrent lead fetches
//! collapse to a single network call.

use std::sync::Arc;
use std::time::Duration;

use leadline_client::{Catalog, RemoteCrm, RESOURCE_ACTIVITIES, RESOURCE_CONTACTS};
use leadline_core::filter::FilterOption;
use leadline_core::lead::{Lead, LeadPatch};
use leadline_core::query::{LeadQuery, MAX_PAGE_SIZE};
use leadline_core::todo::{Todo, TodoPatch};
use leadline_core::transform::{
    lead_from_wire, lead_patch_to_wire, todo_from_wire, todo_patch_to_wire, WireSchema,
};
use leadline_core::types::{now_iso, DbId};
use tokio::sync::{broadcast, RwLock};

use crate::cache::{LeadPage, ResultCache};
use crate::dedupe::Deduplicator;
use crate::error::StoreError;
use crate::signal::StoreSignal;

/// Mutable collections and flags guarded by the store's lock.
#[derive(Default)]
struct StoreState {
    leads: Vec<Lead>,
    todos: Vec<Todo>,
    filters: Vec<FilterOption>,
    active_lead: Option<DbId>,
    catalog: Catalog,
    /// The last query passed to `fetch_leads`; mutations refetch it.
    current_query: LeadQuery,
    last_error: Option<String>,
    loading: bool,
}

/// The shared state provider.
///
/// Construct once via [`LeadStore::new`] and clone the surrounding
/// `Arc` into whatever needs it. All state is instance-owned -- two
/// stores never share a cache or dedup map.
pub struct LeadStore {
    remote: Arc<dyn RemoteCrm>,
    state: RwLock<StoreState>,
    cache: ResultCache,
    inflight: Deduplicator<Result<Arc<LeadPage>, StoreError>>,
}

impl LeadStore {
    /// Create a store over the given remote collaborator.
    pub fn new(remote: Arc<dyn RemoteCrm>) -> Self {
        Self {
            remote,
            state: RwLock::new(StoreState::default()),
            cache: ResultCache::new(),
            inflight: Deduplicator::new(),
        }
    }

    /// Store with a custom cache freshness window (tests shrink it to
    /// force expiry).
    pub fn with_cache_ttl(remote: Arc<dyn RemoteCrm>, ttl: Duration) -> Self {
        Self {
            remote,
            state: RwLock::new(StoreState::default()),
            cache: ResultCache::with_ttl(ttl),
            inflight: Deduplicator::new(),
        }
    }

    // ------------------------------------------------------------------
    // Lead reads
    // ------------------------------------------------------------------

    /// Fetch one page of leads.
    ///
    /// Serves the result cache when it can; otherwise collapses
    /// concurrent identical calls onto one remote read, transforms the
    /// records, refreshes the cache slot, and replaces the in-memory
    /// collection. Failures are recorded for UI display and propagated.
    pub async fn fetch_leads(&self, query: LeadQuery) -> Result<Arc<LeadPage>, StoreError> {
        {
            let mut state = self.state.write().await;
            state.current_query = query.clone();
            state.loading = true;
        }

        if let Some(page) = self.cache.try_get(&query) {
            let mut state = self.state.write().await;
            state.leads = page.leads.clone();
            state.loading = false;
            tracing::debug!(key = %query.cache_key(), "Lead page served from cache");
            return Ok(page);
        }

        let key = query.dedupe_key(RESOURCE_CONTACTS);
        let remote = Arc::clone(&self.remote);
        let request_query = query.clone();
        let outcome = self
            .inflight
            .run(&key, move || async move {
                let raw = remote
                    .fetch_page(RESOURCE_CONTACTS, &request_query)
                    .await
                    .map_err(StoreError::from)?;
                let leads = raw
                    .data
                    .iter()
                    .map(|record| lead_from_wire(WireSchema::Current, record))
                    .collect();
                Ok(Arc::new(LeadPage {
                    leads,
                    total: raw.total,
                }))
            })
            .await;

        let mut state = self.state.write().await;
        state.loading = false;
        match outcome {
            Ok(page) => {
                self.cache.store(&query, Arc::clone(&page));
                state.leads = page.leads.clone();
                state.last_error = None;
                Ok(page)
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                tracing::error!(error = %e, "Failed to fetch leads");
                Err(e)
            }
        }
    }

    /// Return a lead by id, fetching it remotely when it is not in the
    /// collection.
    ///
    /// A fetched record is merged into the collection so detail and
    /// list views agree afterwards. A record the server does not know
    /// is `Ok(None)`, not an error.
    pub async fn fetch_single_lead(&self, id: DbId) -> Result<Option<Lead>, StoreError> {
        if let Some(found) = self.lead_by_id(id).await {
            return Ok(Some(found));
        }

        match self.remote.fetch_one(RESOURCE_CONTACTS, id).await {
            Ok(Some(raw)) => {
                let lead = lead_from_wire(WireSchema::Current, &raw);
                let mut state = self.state.write().await;
                match state.leads.iter_mut().find(|l| l.id == lead.id) {
                    Some(existing) => *existing = lead.clone(),
                    None => state.leads.push(lead.clone()),
                }
                Ok(Some(lead))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                let e = StoreError::from(e);
                self.state.write().await.last_error = Some(e.to_string());
                tracing::error!(lead_id = id, error = %e, "Failed to fetch lead");
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Lead mutations
    // ------------------------------------------------------------------

    /// Create a lead, refetch the current page, and make the new record
    /// the active selection. Returns the server-assigned id.
    pub async fn add_lead(&self, fields: LeadPatch) -> Result<DbId, StoreError> {
        let body = lead_patch_to_wire(&fields);
        let id = match self.remote.create(RESOURCE_CONTACTS, body).await {
            Ok(id) => id,
            Err(e) => {
                let e = StoreError::from(e);
                self.state.write().await.last_error = Some(e.to_string());
                tracing::error!(error = %e, "Failed to create lead");
                return Err(e);
            }
        };

        self.cache.invalidate(true);

        // The create already succeeded; a failed refetch is recorded by
        // fetch_leads but does not void the new id.
        let query = self.state.read().await.current_query.clone();
        if let Err(e) = self.fetch_leads(query).await {
            tracing::warn!(lead_id = id, error = %e, "Refetch after create failed");
        }

        self.state.write().await.active_lead = Some(id);
        tracing::info!(lead_id = id, "Lead created");
        Ok(id)
    }

    /// Update a lead, transmitting only the fields that actually
    /// changed versus the last known copy.
    ///
    /// A patch that changes nothing is a no-op with no network call.
    /// The cache slot is always invalidated on a real update; the
    /// cross-component signal is suppressed when the edited record is
    /// the active selection, so an open detail view is not refreshed
    /// out from under the user.
    pub async fn update_lead(&self, id: DbId, patch: LeadPatch) -> Result<(), StoreError> {
        let (changes, editing_active) = {
            let state = self.state.read().await;
            let editing_active = state.active_lead == Some(id);
            match state.leads.iter().find(|l| l.id == id) {
                Some(lead) => (patch.changes_against(lead), editing_active),
                // No local copy to diff against; send the patch as given.
                None => (patch.clone(), editing_active),
            }
        };

        if changes.is_empty() {
            tracing::debug!(lead_id = id, "Update skipped: no fields changed");
            return Ok(());
        }

        let body = lead_patch_to_wire(&changes);
        if let Err(e) = self.remote.update(RESOURCE_CONTACTS, id, body).await {
            let e = StoreError::from(e);
            self.state.write().await.last_error = Some(e.to_string());
            tracing::error!(lead_id = id, error = %e, "Failed to update lead");
            return Err(e);
        }

        {
            let mut state = self.state.write().await;
            if let Some(lead) = state.leads.iter_mut().find(|l| l.id == id) {
                changes.apply_to(lead);
                lead.updated_at = now_iso();
            }
        }

        self.cache.invalidate(!editing_active);
        tracing::info!(lead_id = id, "Lead updated");
        Ok(())
    }

    /// Delete a lead and, on server confirmation, cascade removal of
    /// its todos and clear the active selection if it pointed at it.
    ///
    /// Local state is untouched when the remote delete fails.
    pub async fn delete_lead(&self, id: DbId) -> Result<(), StoreError> {
        if let Err(e) = self.remote.delete(RESOURCE_CONTACTS, id).await {
            let e = StoreError::from(e);
            self.state.write().await.last_error = Some(e.to_string());
            tracing::error!(lead_id = id, error = %e, "Failed to delete lead");
            return Err(e);
        }

        {
            let mut state = self.state.write().await;
            state.leads.retain(|l| l.id != id);
            state.todos.retain(|t| t.lead_id != id);
            if state.active_lead == Some(id) {
                state.active_lead = None;
            }
        }

        self.cache.invalidate(true);
        tracing::info!(lead_id = id, "Lead deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Todos
    // ------------------------------------------------------------------

    /// Refresh the todo collection.
    ///
    /// Todos are non-critical page furniture: failures are logged and
    /// swallowed so they never block a page.
    pub async fn refresh_todos(&self) {
        let query = LeadQuery {
            per_page: MAX_PAGE_SIZE,
            ..Default::default()
        };
        match self.remote.fetch_page(RESOURCE_ACTIVITIES, &query).await {
            Ok(page) => {
                let todos = page.data.iter().map(todo_from_wire).collect();
                self.state.write().await.todos = todos;
            }
            Err(e) => tracing::warn!(error = %e, "Todo refresh failed"),
        }
    }

    /// Create a todo. On success the whole todo list is refetched
    /// rather than merged -- simpler than incremental reconciliation.
    pub async fn add_todo(&self, fields: TodoPatch) -> Result<DbId, StoreError> {
        let body = todo_patch_to_wire(&fields);
        match self.remote.create(RESOURCE_ACTIVITIES, body).await {
            Ok(id) => {
                self.refresh_todos().await;
                tracing::info!(todo_id = id, "Todo created");
                Ok(id)
            }
            Err(e) => {
                let e = StoreError::from(e);
                self.state.write().await.last_error = Some(e.to_string());
                tracing::error!(error = %e, "Failed to create todo");
                Err(e)
            }
        }
    }

    /// Update a todo with the fields that actually changed; merges
    /// locally on success.
    pub async fn update_todo(&self, id: DbId, patch: TodoPatch) -> Result<(), StoreError> {
        let changes = {
            let state = self.state.read().await;
            match state.todos.iter().find(|t| t.id == id) {
                Some(todo) => patch.changes_against(todo),
                None => patch.clone(),
            }
        };

        if changes.is_empty() {
            return Ok(());
        }

        let body = todo_patch_to_wire(&changes);
        if let Err(e) = self.remote.update(RESOURCE_ACTIVITIES, id, body).await {
            let e = StoreError::from(e);
            self.state.write().await.last_error = Some(e.to_string());
            tracing::error!(todo_id = id, error = %e, "Failed to update todo");
            return Err(e);
        }

        let mut state = self.state.write().await;
        if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
            changes.apply_to(todo);
            todo.updated_at = now_iso();
        }
        Ok(())
    }

    /// Delete a todo; removes it locally on server confirmation.
    pub async fn delete_todo(&self, id: DbId) -> Result<(), StoreError> {
        if let Err(e) = self.remote.delete(RESOURCE_ACTIVITIES, id).await {
            let e = StoreError::from(e);
            self.state.write().await.last_error = Some(e.to_string());
            tracing::error!(todo_id = id, error = %e, "Failed to delete todo");
            return Err(e);
        }

        self.state.write().await.todos.retain(|t| t.id != id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Refresh the option catalog (tags, assignable owners, named
    /// lists). Failures are logged and swallowed.
    pub async fn refresh_catalog(&self) {
        match self.remote.fetch_catalog().await {
            Ok(catalog) => self.state.write().await.catalog = catalog,
            Err(e) => tracing::warn!(error = %e, "Catalog refresh failed"),
        }
    }

    // ------------------------------------------------------------------
    // Filters (local only, no network effect)
    // ------------------------------------------------------------------

    /// Replace the filter list.
    pub async fn set_filters(&self, filters: Vec<FilterOption>) {
        self.state.write().await.filters = filters;
    }

    /// Remove the filter at `index`; out-of-range indices are ignored.
    pub async fn remove_filter_at(&self, index: usize) {
        let mut state = self.state.write().await;
        if index < state.filters.len() {
            state.filters.remove(index);
        }
    }

    /// Clear all filters.
    ///
    /// Cached lead pages are keyed partly by filter content, so the
    /// slot is dropped too. No broadcast: the clearing view refetches
    /// immediately itself.
    pub async fn clear_filters(&self) {
        self.state.write().await.filters.clear();
        self.cache.invalidate(false);
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Snapshot of the lead collection.
    pub async fn leads(&self) -> Vec<Lead> {
        self.state.read().await.leads.clone()
    }

    /// Leads as the UI lists them.
    ///
    /// Lead filtering happens server-side via query parameters, so this
    /// is a pass-through of the fetched collection.
    pub async fn filtered_leads(&self) -> Vec<Lead> {
        self.leads().await
    }

    /// Snapshot of the todo collection.
    pub async fn todos(&self) -> Vec<Todo> {
        self.state.read().await.todos.clone()
    }

    /// Todos matching every current filter.
    pub async fn filtered_todos(&self) -> Vec<Todo> {
        let state = self.state.read().await;
        state
            .todos
            .iter()
            .filter(|todo| state.filters.iter().all(|f| f.matches_todo(todo)))
            .cloned()
            .collect()
    }

    pub async fn lead_by_id(&self, id: DbId) -> Option<Lead> {
        self.state
            .read()
            .await
            .leads
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }

    pub async fn todos_by_lead(&self, lead_id: DbId) -> Vec<Todo> {
        self.state
            .read()
            .await
            .todos
            .iter()
            .filter(|t| t.lead_id == lead_id)
            .cloned()
            .collect()
    }

    /// Snapshot of the filter list.
    pub async fn filters(&self) -> Vec<FilterOption> {
        self.state.read().await.filters.clone()
    }

    /// The lead a detail view currently has open, if any.
    pub async fn active_lead(&self) -> Option<DbId> {
        self.state.read().await.active_lead
    }

    pub async fn set_active_lead(&self, id: Option<DbId>) {
        self.state.write().await.active_lead = id;
    }

    /// Snapshot of the option catalog.
    pub async fn catalog(&self) -> Catalog {
        self.state.read().await.catalog.clone()
    }

    /// Message of the most recent failed operation, for UI display.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Whether a lead fetch is currently in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Subscribe to cache invalidation broadcasts.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreSignal> {
        self.cache.subscribe()
    }
}
