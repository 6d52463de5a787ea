//! Item-to-item similarity index.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use super::builder::group_stable;
use crate::error::{LoadError, ServingResult};
use crate::traits::SimilaritySource;
use crate::types::{validate_k, ItemId, Neighbor, SimilarityRecord};

/// Immutable item -> neighbors table, each list sorted by score descending.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    neighbors: HashMap<ItemId, Vec<Neighbor>>,
    row_count: usize,
}

impl SimilarityIndex {
    /// Build the index from snapshot rows.
    ///
    /// Neighbors with equal scores keep their row order.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidValue` if any score is NaN or infinite.
    /// Nothing is built in that case.
    pub fn build(rows: Vec<SimilarityRecord>) -> Result<Self, LoadError> {
        if let Some(row) = rows.iter().position(|r| !r.score.is_finite()) {
            return Err(LoadError::InvalidValue {
                snapshot: "similarity".to_string(),
                column: "score".to_string(),
                row,
                reason: format!("score must be finite, got {}", rows[row].score),
            });
        }

        let row_count = rows.len();
        let neighbors = group_stable(
            rows,
            |r: SimilarityRecord| (r.item_id, Neighbor::new(r.neighbor_id, r.score)),
            Neighbor::by_score_desc,
        );

        info!(
            items = neighbors.len(),
            rows = row_count,
            "Built similarity index"
        );
        Ok(Self {
            neighbors,
            row_count,
        })
    }

    /// First `k` neighbors of `item_id`.
    ///
    /// Unknown items yield an empty slice.
    ///
    /// # Errors
    ///
    /// Returns `ServingError::InvalidRequest` when `k <= 0`.
    pub fn query(&self, item_id: ItemId, k: i64) -> ServingResult<&[Neighbor]> {
        let k = validate_k(k)?;
        Ok(self.top(item_id, k))
    }

    /// Up to `k` neighbors without validating `k`.
    pub(crate) fn top(&self, item_id: ItemId, k: usize) -> &[Neighbor] {
        match self.neighbors.get(&item_id) {
            Some(list) => &list[..k.min(list.len())],
            None => &[],
        }
    }

    /// Number of items with at least one neighbor.
    pub fn item_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of snapshot rows the index was built from.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.neighbors.contains_key(&item_id)
    }
}

#[async_trait]
impl SimilaritySource for SimilarityIndex {
    async fn similar_items(&self, item_id: ItemId, k: usize) -> ServingResult<Vec<Neighbor>> {
        Ok(self.top(item_id, k).to_vec())
    }
}
