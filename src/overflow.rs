//! Recovery of records swallowed by a rejected or replaced candidate range.

use std::collections::{BTreeMap, HashSet};

use crate::address::AddressSpace;
use crate::aggregator::AggregationEntry;
use crate::sets::{self, IndexSet};

/// Pull ranges from earlier levels that re-cover the `overflow` indices.
///
/// Levels are scanned in ascending order, so a broader entry from a later
/// level replaces every narrower one registered for its records. Entries
/// register under their smallest index. Recovered ranges not yet in `seen`,
/// and not already inside an entry of `target`, are appended to `target` in
/// range order.
pub(crate) fn resolve(
    levels: &[Vec<AggregationEntry>],
    overflow: &IndexSet,
    seen: &mut HashSet<AddressSpace>,
    target: &mut Vec<AggregationEntry>,
) {
    if overflow.is_empty() {
        return;
    }

    let mut registered: BTreeMap<usize, &AggregationEntry> = BTreeMap::new();
    for level in levels {
        for entry in level {
            if !sets::is_subset_of(&entry.covered, overflow, false) {
                continue;
            }
            let Some(&first) = entry.covered.first() else {
                continue;
            };
            registered.retain(|_, known| {
                !sets::is_subset_of(&known.covered, &entry.covered, false)
            });
            registered.insert(first, entry);
        }
    }

    let mut recovered: Vec<&AggregationEntry> = registered.into_values().collect();
    recovered.sort_by(|a, b| a.range.cmp(&b.range));
    for entry in recovered {
        let inside = target
            .iter()
            .any(|kept| sets::is_superset_of(&kept.covered, &entry.covered, false));
        if !inside && seen.insert(entry.range) {
            target.push(entry.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(range: &str, covered: &[usize]) -> AggregationEntry {
        AggregationEntry {
            range: range.parse().unwrap(),
            covered: covered.iter().copied().collect(),
        }
    }

    fn ranges(entries: &[AggregationEntry]) -> Vec<String> {
        entries.iter().map(|e| e.range.canonical_string()).collect()
    }

    #[test]
    fn test_recovers_single_records() {
        let levels = vec![vec![
            entry("10.0.0.1", &[0]),
            entry("10.0.0.2", &[1]),
            entry("10.0.0.9", &[2]),
        ]];
        let overflow: IndexSet = [0, 2].into_iter().collect();
        let mut seen = HashSet::new();
        let mut target = Vec::new();

        resolve(&levels, &overflow, &mut seen, &mut target);
        assert_eq!(ranges(&target), vec!["10.0.0.1", "10.0.0.9"]);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_group_replaces_members() {
        let levels = vec![
            vec![
                entry("10.0.0.2", &[0]),
                entry("10.0.0.3", &[1]),
                entry("10.0.0.9", &[2]),
            ],
            vec![entry("10.0.0.2/31", &[0, 1]), entry("10.0.0.9", &[2])],
        ];
        let overflow: IndexSet = [0, 1].into_iter().collect();
        let mut seen = HashSet::new();
        let mut target = Vec::new();

        resolve(&levels, &overflow, &mut seen, &mut target);
        assert_eq!(ranges(&target), vec!["10.0.0.2/31"]);
    }

    #[test]
    fn test_broader_group_replaces_narrower_group() {
        let levels = vec![
            vec![
                entry("10.0.0.0", &[0]),
                entry("10.0.2.0", &[1]),
                entry("10.0.2.1", &[2]),
            ],
            vec![entry("10.0.0.0", &[0]), entry("10.0.2.0/31", &[1, 2])],
            vec![entry("10.0.0.0/22", &[0, 1, 2])],
        ];
        let overflow: IndexSet = [0, 1, 2].into_iter().collect();
        let mut seen = HashSet::new();
        let mut target = Vec::new();

        resolve(&levels, &overflow, &mut seen, &mut target);
        assert_eq!(ranges(&target), vec!["10.0.0.0/22"]);
    }

    #[test]
    fn test_skips_records_already_in_target() {
        let levels = vec![vec![
            entry("10.0.0.1", &[0]),
            entry("10.0.0.2", &[1]),
            entry("10.0.0.3", &[2]),
        ]];
        let overflow: IndexSet = [0, 1, 2].into_iter().collect();
        let mut seen = HashSet::new();
        let mut target = vec![entry("10.0.0.2/31", &[1, 2])];

        resolve(&levels, &overflow, &mut seen, &mut target);
        assert_eq!(ranges(&target), vec!["10.0.0.2/31", "10.0.0.1"]);
    }

    #[test]
    fn test_skips_seen_and_partial_entries() {
        let levels = vec![vec![
            entry("10.0.0.1", &[0]),
            entry("10.0.0.2/31", &[1, 2]),
        ]];
        let overflow: IndexSet = [0, 1].into_iter().collect();
        let mut seen: HashSet<AddressSpace> = HashSet::new();
        seen.insert("10.0.0.1".parse().unwrap());
        let mut target = Vec::new();

        resolve(&levels, &overflow, &mut seen, &mut target);
        assert!(target.is_empty());
    }

    #[test]
    fn test_empty_overflow_is_noop() {
        let levels = vec![vec![entry("10.0.0.1", &[0])]];
        let mut seen = HashSet::new();
        let mut target = Vec::new();

        resolve(&levels, &IndexSet::new(), &mut seen, &mut target);
        assert!(target.is_empty());
        assert!(seen.is_empty());
    }
}
