//! Collaborator traits consumed by the recommenders.
//!
//! Both traits are async so that an implementation may live behind a network
//! boundary. Callers bound every call with a timeout and treat failures as an
//! empty contribution.

mod event_history;
mod similarity_source;

pub use event_history::EventHistoryProvider;
pub use similarity_source::SimilaritySource;
