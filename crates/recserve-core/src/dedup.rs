//! Order-preserving deduplication shared by online generation and blending.

use std::collections::HashSet;
use std::hash::Hash;

/// Return each distinct value once, at the position of its first occurrence.
///
/// The input is left untouched. The membership set lives only for the
/// duration of the call.
///
/// # Example
///
/// ```
/// use recserve_core::dedup_ids;
///
/// assert_eq!(dedup_ids(&[1u64, 2, 1, 3, 2]), vec![1, 2, 3]);
/// ```
pub fn dedup_ids<T>(ids: &[T]) -> Vec<T>
where
    T: Eq + Hash + Copy,
{
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
