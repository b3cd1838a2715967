//! Collapsing of concurrent identical requests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

type SharedRequest<T> = Shared<BoxFuture<'static, T>>;

/// Collapses concurrent calls that share a request key onto one
/// underlying future.
///
/// The first caller for a key registers the operation; callers arriving
/// while it is pending share the same [`Shared`] handle and settle with
/// the same outcome. The entry is removed when the operation completes
/// -- success or failure -- so subsequent calls start fresh.
pub struct Deduplicator<T: Clone> {
    inflight: Mutex<HashMap<String, SharedRequest<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Deduplicator<T> {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Run `make()` under `key`, or piggyback on the call already in
    /// flight for it.
    pub async fn run<F>(&self, key: &str, make: impl FnOnce() -> F) -> T
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (request, created) = {
            let mut inflight = self.lock();
            match inflight.get(key) {
                Some(pending) => (pending.clone(), false),
                None => {
                    let request: SharedRequest<T> = make().boxed().shared();
                    inflight.insert(key.to_string(), request.clone());
                    (request, true)
                }
            }
        };

        let outcome = request.await;

        if created {
            // Only the creator removes its entry. Co-waiters never touch
            // the map, and a successor can only register after this
            // removal, so the remove cannot evict a fresh request.
            self.lock().remove(key);
        }

        outcome
    }

    /// Number of requests currently in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SharedRequest<T>>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Deduplicator<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
