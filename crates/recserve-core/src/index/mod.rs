//! Immutable in-memory ranked indexes.
//!
//! Both indexes are built exactly once from snapshot rows and are read-only
//! afterwards. They are shared between request handlers behind `Arc` and
//! need no locking. A rebuild produces a new index value; nothing here
//! mutates in place.

mod builder;
mod recommendation;
mod similarity;


pub use recommendation::{OfflineSource, RecommendationIndex};
pub use similarity::SimilarityIndex;
