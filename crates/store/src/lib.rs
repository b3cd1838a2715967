//! Shared state provider for the leadline UI.
//!
//! This crate owns the in-memory Lead/Todo/Filter collections and the
//! machinery that keeps them consistent with the remote CRM:
//!
//! - [`LeadStore`] -- the collections plus fetch/add/update/delete
//!   operations UI layers call.
//! - [`ResultCache`] -- single-slot, time-boxed cache of the most
//!   recent leads query.
//! - [`Deduplicator`] -- collapses concurrent identical requests onto
//!   one network call.
//! - [`SignalBus`] / [`StoreSignal`] -- in-process broadcast telling
//!   other consumers their cached view may be stale.

pub mod cache;
pub mod dedupe;
pub mod error;
pub mod signal;
pub mod store;

pub use cache::{LeadPage, ResultCache, FRESHNESS_WINDOW};
pub use dedupe::Deduplicator;
pub use error::StoreError;
pub use signal::{SignalBus, StoreSignal};
pub use store::LeadStore;
