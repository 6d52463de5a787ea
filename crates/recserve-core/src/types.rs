//! Shared domain types.
//!
//! Identifiers are plain non-negative integers, matching the snapshot
//! schemas. Rows are the typed form of one snapshot line; indexes are built
//! from batches of them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{ServingError, ServingResult};

/// Item identifier.
pub type ItemId = u64;

/// User identifier.
pub type UserId = u64;

/// One row of the similarity snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    /// Source item (`item_id_1` column).
    pub item_id: ItemId,
    /// Similar item (`item_id_2` column).
    pub neighbor_id: ItemId,
    /// Similarity strength, higher is more similar.
    pub score: f64,
}

/// One row of the personal recommendation snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalRanking {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Position in the user's ranking, lower is better.
    pub rank: i64,
}

/// One row of the global default ranking snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRankingRow {
    pub item_id: ItemId,
    pub rank: i64,
}

/// A similar item returned by a similarity query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub item_id: ItemId,
    pub score: f64,
}

impl Neighbor {
    pub fn new(item_id: ItemId, score: f64) -> Self {
        Self { item_id, score }
    }

    /// Orders by score descending. `-0.0` and `0.0` compare equal so a
    /// stable sort keeps them in input order.
    pub fn by_score_desc(a: &Neighbor, b: &Neighbor) -> Ordering {
        (b.score + 0.0).total_cmp(&(a.score + 0.0))
    }
}

/// Validate a requested result length.
///
/// # Errors
///
/// Returns [`ServingError::InvalidRequest`] when `k <= 0`.
pub fn validate_k(k: i64) -> ServingResult<usize> {
    if k <= 0 {
        return Err(ServingError::InvalidRequest(format!(
            "k must be positive, got {}",
            k
        )));
    }
    usize::try_from(k)
        .map_err(|_| ServingError::InvalidRequest(format!("k is too large: {}", k)))
}
