//! Group-and-sort helper shared by the index builders.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Group `rows` by key and stable-sort each group with `cmp`.
///
/// Within a group, elements that compare equal keep their input order.
pub(super) fn group_stable<R, K, V, S, C>(
    rows: impl IntoIterator<Item = R>,
    mut split: S,
    cmp: C,
) -> HashMap<K, Vec<V>>
where
    K: Eq + Hash,
    S: FnMut(R) -> (K, V),
    C: Fn(&V, &V) -> Ordering,
{
    let mut groups: HashMap<K, Vec<V>> = HashMap::new();
    for row in rows {
        let (key, value) = split(row);
        groups.entry(key).or_default().push(value);
    }
    for group in groups.values_mut() {
        // `sort_by` is stable.
        group.sort_by(&cmp);
        group.shrink_to_fit();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_stable_keeps_tie_order() {
        let rows = vec![(1, 'a', 5), (2, 'x', 1), (1, 'b', 5), (1, 'c', 9)];
        let groups = group_stable(
            rows,
            |(k, tag, v)| (k, (tag, v)),
            |a: &(char, i32), b: &(char, i32)| b.1.cmp(&a.1),
        );

        assert_eq!(groups[&1], vec![('c', 9), ('a', 5), ('b', 5)]);
        assert_eq!(groups[&2], vec![('x', 1)]);
    }
}
