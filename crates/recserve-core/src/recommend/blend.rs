//! Blending of offline and online rankings.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::{OfflineRecommender, OnlineCandidateGenerator};
use crate::config::BlendConfig;
use crate::dedup::dedup_ids;
use crate::error::ServingResult;
use crate::types::{validate_k, ItemId, UserId};

/// Interleave `offline` and `online`, append the longer tail, dedup, cut to `k`.
///
/// Position `i` of the interleaved prefix takes `offline[i]` when `i` is even
/// and `online[i]` when odd. The result is deterministic for given inputs.
///
/// ```
/// use recserve_core::blend;
///
/// assert_eq!(blend(&[1, 2, 3, 4], &[5, 6], 10), vec![1, 6, 3, 4]);
/// assert_eq!(blend(&[], &[5, 6], 10), vec![5, 6]);
/// ```
pub fn blend(offline: &[ItemId], online: &[ItemId], k: usize) -> Vec<ItemId> {
    let m = offline.len().min(online.len());
    let mut merged = Vec::with_capacity(offline.len() + online.len());

    merged.extend((0..m).map(|i| if i % 2 == 0 { offline[i] } else { online[i] }));
    merged.extend_from_slice(&offline[m..]);
    merged.extend_from_slice(&online[m..]);

    let mut blended = dedup_ids(&merged);
    blended.truncate(k);
    blended
}

/// Runs the offline and online branches concurrently and blends them.
#[derive(Debug, Clone)]
pub struct Blender {
    offline: OfflineRecommender,
    online: OnlineCandidateGenerator,
    branch_timeout: Duration,
    request_timeout: Duration,
}

impl Blender {
    pub fn new(
        offline: OfflineRecommender,
        online: OnlineCandidateGenerator,
        config: &BlendConfig,
    ) -> Self {
        Self {
            offline,
            online,
            branch_timeout: config.branch_timeout(),
            request_timeout: config.request_timeout(),
        }
    }

    /// Blended recommendations for `user_id`.
    ///
    /// Each branch gets its own budget, capped by the end-to-end deadline. A
    /// branch that misses its deadline is cancelled and contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ServingError::InvalidRequest` when `k <= 0`.
    pub async fn recommend(&self, user_id: UserId, k: i64) -> ServingResult<Vec<ItemId>> {
        let k = validate_k(k)?;

        let start = Instant::now();
        let request_deadline = start + self.request_timeout;
        let branch_deadline = (start + self.branch_timeout).min(request_deadline);

        let (offline, online) = tokio::join!(
            bounded("offline", user_id, branch_deadline, async {
                self.offline.top(user_id, k)
            }),
            bounded(
                "online",
                user_id,
                branch_deadline,
                self.online.candidates(user_id, k)
            ),
        );

        let blended = blend(&offline, &online, k);
        debug!(
            user_id,
            k,
            offline = offline.len(),
            online = online.len(),
            count = blended.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Blended recommendations"
        );
        Ok(blended)
    }

    pub fn offline(&self) -> &OfflineRecommender {
        &self.offline
    }

    pub fn online(&self) -> &OnlineCandidateGenerator {
        &self.online
    }
}

/// Await `branch` until `deadline`; an expired branch yields an empty list.
async fn bounded<F>(branch: &'static str, user_id: UserId, deadline: Instant, fut: F) -> Vec<ItemId>
where
    F: Future<Output = Vec<ItemId>>,
{
    match tokio::time::timeout_at(deadline, fut).await {
        Ok(items) => items,
        Err(_) => {
            warn!(user_id, branch, "Branch missed its deadline, substituting empty list");
            Vec::new()
        }
    }
}
