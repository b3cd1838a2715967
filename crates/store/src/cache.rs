//! Single-slot, time-boxed cache for the most recent leads query.
//!
//! The cache holds exactly one page keyed by the query's canonical
//! parameter string. Any successful fetch replaces the slot whole, and
//! any mutation clears it -- entries never merge. That discards
//! otherwise-valid unrelated data on every write, a simplicity
//! trade-off the data layer accepts.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use leadline_core::lead::Lead;
use leadline_core::query::LeadQuery;
use tokio::sync::broadcast;

use crate::signal::{SignalBus, StoreSignal};

/// How long a cached page stays servable.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(120);

/// One page of transformed leads plus the server's total count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub total: i64,
}

struct Slot {
    key: String,
    page: Arc<LeadPage>,
    stored_at: Instant,
}

/// Single-slot result cache with an invalidation broadcast.
pub struct ResultCache {
    slot: Mutex<Option<Slot>>,
    ttl: Duration,
    bus: SignalBus,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_ttl(FRESHNESS_WINDOW)
    }

    /// Cache with a custom freshness window. Tests shrink it to force
    /// expiry without waiting.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
            bus: SignalBus::default(),
        }
    }

    /// Return the cached page when the canonical key matches exactly
    /// and the entry is still fresh; otherwise report a miss.
    pub fn try_get(&self, query: &LeadQuery) -> Option<Arc<LeadPage>> {
        let key = query.cache_key();
        let slot = self.lock();
        match slot.as_ref() {
            Some(s) if s.key == key && s.stored_at.elapsed() < self.ttl => {
                Some(Arc::clone(&s.page))
            }
            _ => None,
        }
    }

    /// Replace the slot with a new result. The previous entry, if any,
    /// is discarded whole.
    pub fn store(&self, query: &LeadQuery, page: Arc<LeadPage>) {
        *self.lock() = Some(Slot {
            key: query.cache_key(),
            page,
            stored_at: Instant::now(),
        });
    }

    /// Clear the slot so the next [`try_get`](Self::try_get) misses.
    ///
    /// With `broadcast`, other consumers of the cache are signalled to
    /// reconsider refetching. Suppressing the signal lets a detail-view
    /// edit avoid refreshing the list view underneath the user while
    /// still keeping the stale slot unservable.
    pub fn invalidate(&self, broadcast: bool) {
        *self.lock() = None;
        if broadcast {
            self.bus.publish(StoreSignal::LeadsCacheInvalidated);
        }
    }

    /// Subscribe to invalidation broadcasts.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreSignal> {
        self.bus.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
