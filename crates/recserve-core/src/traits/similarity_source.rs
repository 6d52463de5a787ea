//! Similarity lookup collaborator.

use async_trait::async_trait;

use crate::error::ServingResult;
use crate::types::{ItemId, Neighbor};

/// Source of item neighbors ordered by similarity.
///
/// [`crate::SimilarityIndex`] implements this directly. Remote lookups can
/// implement it too; the online generator does not care which.
#[async_trait]
pub trait SimilaritySource: Send + Sync {
    /// Up to `k` neighbors of `item_id`, score descending. Unknown items
    /// yield an empty list.
    async fn similar_items(&self, item_id: ItemId, k: usize) -> ServingResult<Vec<Neighbor>>;
}
