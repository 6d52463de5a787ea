//! Per-user precomputed rankings plus the global fallback ranking.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use super::builder::group_stable;
use crate::types::{DefaultRankingRow, ItemId, PersonalRanking, UserId};

/// Which ranking answered an offline lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineSource {
    Personal,
    Default,
}

/// Immutable user -> ranked items table with a global default ranking.
#[derive(Debug, Default)]
pub struct RecommendationIndex {
    personal: HashMap<UserId, Vec<ItemId>>,
    default: Vec<ItemId>,
}

impl RecommendationIndex {
    /// Build from personal and default ranking rows.
    ///
    /// Each user's items and the default ranking are ordered by rank
    /// ascending; equal ranks keep row order.
    pub fn build(personal: Vec<PersonalRanking>, default: Vec<DefaultRankingRow>) -> Self {
        let personal_rows = personal.len();
        let personal: HashMap<UserId, Vec<ItemId>> = group_stable(
            personal,
            |r: PersonalRanking| (r.user_id, (r.rank, r.item_id)),
            |a: &(i64, ItemId), b: &(i64, ItemId)| a.0.cmp(&b.0),
        )
        .into_iter()
        .map(|(user_id, ranked)| (user_id, ranked.into_iter().map(|(_, item)| item).collect()))
        .collect();

        let mut default = default;
        default.sort_by_key(|r| r.rank);
        let default: Vec<ItemId> = default.into_iter().map(|r| r.item_id).collect();

        info!(
            users = personal.len(),
            personal_rows,
            default_len = default.len(),
            "Built recommendation index"
        );
        Self { personal, default }
    }

    /// Full personal ranking for `user_id`, if one exists.
    pub fn personal(&self, user_id: UserId) -> Option<&[ItemId]> {
        self.personal.get(&user_id).map(Vec::as_slice)
    }

    /// The global fallback ranking.
    pub fn default_ranking(&self) -> &[ItemId] {
        &self.default
    }

    /// First `k` items for `user_id`, falling back to the default ranking.
    pub(crate) fn top(&self, user_id: UserId, k: usize) -> (&[ItemId], OfflineSource) {
        match self.personal(user_id) {
            Some(list) => (&list[..k.min(list.len())], OfflineSource::Personal),
            None => (
                &self.default[..k.min(self.default.len())],
                OfflineSource::Default,
            ),
        }
    }

    pub fn user_count(&self) -> usize {
        self.personal.len()
    }
}
