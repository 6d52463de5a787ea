//! In-memory event history.
//!
//! Keeps a bounded, newest-first list of interacted items per user. This is
//! the only mutable shared state in the process; it is guarded by a
//! `parking_lot::RwLock` and never touches the ranked indexes.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::ServingResult;
use crate::traits::EventHistoryProvider;
use crate::types::{ItemId, UserId};

/// Thread-safe in-memory [`EventHistoryProvider`].
#[derive(Debug)]
pub struct InMemoryEventHistory {
    events: RwLock<HashMap<UserId, VecDeque<ItemId>>>,
    max_per_user: usize,
}

impl InMemoryEventHistory {
    /// Create an empty history retaining at most `max_per_user` events per
    /// user. A zero limit is raised to 1.
    pub fn new(max_per_user: usize) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            max_per_user: max_per_user.max(1),
        }
    }

    /// Record that `user_id` interacted with `item_id`.
    pub fn put(&self, user_id: UserId, item_id: ItemId) {
        let mut events = self.events.write();
        let list = events.entry(user_id).or_default();
        list.push_front(item_id);
        list.truncate(self.max_per_user);
        debug!(user_id, item_id, retained = list.len(), "Recorded event");
    }

    /// Newest-first events for `user_id`, at most `count`.
    pub fn get(&self, user_id: UserId, count: usize) -> Vec<ItemId> {
        self.events
            .read()
            .get(&user_id)
            .map(|list| list.iter().take(count).copied().collect())
            .unwrap_or_default()
    }

    pub fn max_per_user(&self) -> usize {
        self.max_per_user
    }
}

impl Default for InMemoryEventHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl EventHistoryProvider for InMemoryEventHistory {
    async fn recent_items(&self, user_id: UserId, count: usize) -> ServingResult<Vec<ItemId>> {
        Ok(self.get(user_id, count))
    }

    fn name(&self) -> &'static str {
        "in_memory_event_history"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_newest_first() {
        let history = InMemoryEventHistory::new(10);
        for item in [53404, 33311009, 178529, 35505245, 795836] {
            history.put(1337055, item);
        }
        assert_eq!(history.get(1337055, 3), vec![795836, 35505245, 178529]);
    }

    #[test]
    fn test_unknown_user_is_empty() {
        let history = InMemoryEventHistory::default();
        assert!(history.get(42, 3).is_empty());
    }

    #[test]
    fn test_put_truncates_to_limit() {
        let history = InMemoryEventHistory::new(2);
        history.put(1, 10);
        history.put(1, 11);
        history.put(1, 12);
        assert_eq!(history.get(1, 10), vec![12, 11]);
    }

    #[test]
    fn test_zero_limit_is_raised() {
        assert_eq!(InMemoryEventHistory::new(0).max_per_user(), 1);
    }

    #[tokio::test]
    async fn test_provider_contract_for_unknown_user() {
        let history = InMemoryEventHistory::default();
        let items = history
            .recent_items(999, 3)
            .await
            .expect("unknown users must not error");
        assert!(items.is_empty());
    }
}
