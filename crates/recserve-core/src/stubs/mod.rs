//! In-process collaborator implementations.
//!
//! Used by the stdio server in place of a networked event store, and by
//! tests.

mod in_memory_history;

pub use in_memory_history::InMemoryEventHistory;
