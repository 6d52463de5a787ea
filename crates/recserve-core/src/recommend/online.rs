//! Online candidate generation from recent interactions.
//!
//! For each of the user's most recent events, look up similar items
//! concurrently, pool every `(neighbor, score)` pair, order by score, keep
//! the best-scoring copy of each neighbor and cut to `k`.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::OnlineConfig;
use crate::dedup::dedup_ids;
use crate::error::{ServingError, ServingResult};
use crate::traits::{EventHistoryProvider, SimilaritySource};
use crate::types::{validate_k, ItemId, Neighbor, UserId};

/// Derives a ranked candidate list from live behavior.
#[derive(Clone)]
pub struct OnlineCandidateGenerator {
    history: Arc<dyn EventHistoryProvider>,
    similarity: Arc<dyn SimilaritySource>,
    event_count: usize,
    history_timeout: Duration,
    similarity_timeout: Duration,
}

impl OnlineCandidateGenerator {
    pub fn new(
        history: Arc<dyn EventHistoryProvider>,
        similarity: Arc<dyn SimilaritySource>,
        config: &OnlineConfig,
    ) -> Self {
        Self {
            history,
            similarity,
            event_count: config.event_count,
            history_timeout: config.history_timeout(),
            similarity_timeout: config.similarity_timeout(),
        }
    }

    /// Up to `k` candidates for `user_id`.
    ///
    /// Upstream failures and timeouts never fail the call; they only shrink
    /// the result, down to empty.
    ///
    /// # Errors
    ///
    /// Returns `ServingError::InvalidRequest` when `k <= 0`.
    pub async fn generate(&self, user_id: UserId, k: i64) -> ServingResult<Vec<ItemId>> {
        let k = validate_k(k)?;
        Ok(self.candidates(user_id, k).await)
    }

    pub(crate) async fn candidates(&self, user_id: UserId, k: usize) -> Vec<ItemId> {
        let events = self.recent_events(user_id).await;
        if events.is_empty() {
            debug!(user_id, "No recent events, online candidates empty");
            return Vec::new();
        }

        // Gathered in event order, so ties below favor the most recent event.
        let batches = join_all(events.iter().map(|&item_id| self.neighbors_of(item_id, k))).await;
        let candidates = rank_candidates(batches, k);

        debug!(
            user_id,
            k,
            events = events.len(),
            count = candidates.len(),
            "Online candidates"
        );
        candidates
    }

    async fn recent_events(&self, user_id: UserId) -> Vec<ItemId> {
        let call = self.history.recent_items(user_id, self.event_count);
        match tokio::time::timeout(self.history_timeout, call).await {
            Ok(Ok(mut items)) => {
                items.truncate(self.event_count);
                items
            }
            Ok(Err(e)) => {
                warn!(user_id, provider = self.history.name(), error = %e, "Event history failed, using no events");
                Vec::new()
            }
            Err(_) => {
                let e = ServingError::upstream(
                    "event_history",
                    format!("timed out after {}ms", self.history_timeout.as_millis()),
                );
                warn!(user_id, provider = self.history.name(), error = %e, "Event history timed out, using no events");
                Vec::new()
            }
        }
    }

    async fn neighbors_of(&self, item_id: ItemId, k: usize) -> Vec<Neighbor> {
        let call = self.similarity.similar_items(item_id, k);
        match tokio::time::timeout(self.similarity_timeout, call).await {
            Ok(Ok(mut neighbors)) => {
                neighbors.truncate(k);
                neighbors
            }
            Ok(Err(e)) => {
                warn!(item_id, error = %e, "Similarity lookup failed, dropping branch");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    item_id,
                    timeout_ms = self.similarity_timeout.as_millis() as u64,
                    "Similarity lookup timed out, dropping branch"
                );
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for OnlineCandidateGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnlineCandidateGenerator")
            .field("event_count", &self.event_count)
            .field("history_timeout", &self.history_timeout)
            .field("similarity_timeout", &self.similarity_timeout)
            .finish_non_exhaustive()
    }
}

/// Pool neighbor batches, order by score descending (stable), dedup, cut.
pub(crate) fn rank_candidates(batches: Vec<Vec<Neighbor>>, k: usize) -> Vec<ItemId> {
    let mut pooled: Vec<Neighbor> = batches.into_iter().flatten().collect();
    pooled.sort_by(Neighbor::by_score_desc);

    let ids: Vec<ItemId> = pooled.iter().map(|n| n.item_id).collect();
    let mut ranked = dedup_ids(&ids);
    ranked.truncate(k);
    ranked
}
