//! Event history collaborator.

use async_trait::async_trait;

use crate::error::ServingResult;
use crate::types::{ItemId, UserId};

/// Source of a user's most recent interactions.
///
/// # Contract
///
/// - Returns at most `count` item ids, most recent first
/// - Returns an empty list for unknown users, never an error
/// - May fail for transport reasons; callers degrade to an empty list
#[async_trait]
pub trait EventHistoryProvider: Send + Sync {
    /// Most recent interacted items for `user_id`.
    async fn recent_items(&self, user_id: UserId, count: usize) -> ServingResult<Vec<ItemId>>;

    /// Provider name used in log fields.
    fn name(&self) -> &'static str {
        "event_history"
    }
}
