//! Offline (precomputed) recommendations.

use std::sync::Arc;

use tracing::debug;

use crate::error::ServingResult;
use crate::index::{OfflineSource, RecommendationIndex};
use crate::types::{validate_k, ItemId, UserId};

/// Looks up a user's precomputed ranking, falling back to the default one.
#[derive(Debug, Clone)]
pub struct OfflineRecommender {
    index: Arc<RecommendationIndex>,
}

impl OfflineRecommender {
    pub fn new(index: Arc<RecommendationIndex>) -> Self {
        Self { index }
    }

    /// First `k` items of the user's ranking, or of the default ranking when
    /// the user has none.
    ///
    /// # Errors
    ///
    /// Returns `ServingError::InvalidRequest` when `k <= 0`.
    pub fn get(&self, user_id: UserId, k: i64) -> ServingResult<Vec<ItemId>> {
        let k = validate_k(k)?;
        Ok(self.top(user_id, k))
    }

    pub(crate) fn top(&self, user_id: UserId, k: usize) -> Vec<ItemId> {
        let (items, source) = self.index.top(user_id, k);
        debug!(user_id, k, count = items.len(), source = ?source, "Offline recommendations");
        items.to_vec()
    }

    /// Which ranking would answer for `user_id`.
    pub fn source_for(&self, user_id: UserId) -> OfflineSource {
        if self.index.personal(user_id).is_some() {
            OfflineSource::Personal
        } else {
            OfflineSource::Default
        }
    }
}
