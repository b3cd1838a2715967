//! Domain types and pure data logic for the leadline client.
//!
//! This crate has no I/O. Its transformation and mapping functions are
//! total: they accept arbitrary wire input and always produce a usable
//! value, coercing to documented defaults instead of erroring, because
//! the UI must always have something to render.

pub mod filter;
pub mod lead;
pub mod options;
pub mod query;
pub mod todo;
pub mod transform;
pub mod types;

pub use filter::{FilterOp, FilterOption};
pub use lead::{Lead, LeadPatch};
pub use options::{OptionSet, PRIORITIES, SOURCES, STAGES};
pub use query::{LeadQuery, SortDir};
pub use todo::{Todo, TodoPatch, TodoStatus};
pub use transform::{lead_from_wire, todo_from_wire, WireSchema};
