//! Hierarchical CIDR aggregation of per-address usage records.
//!
//! Level 0 holds one entry per record. Each following level merges pairs of
//! entries from the previous one into their smallest common covering range,
//! as long as that range's prefix length stays inside the [`PrefixPolicy`]
//! window. For IPv6 input, level 1 groups records by their /64 first.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::address::{AddressSpace, IpVersion};
use crate::error::IpaggError;
use crate::overflow;
use crate::policy::PrefixPolicy;
use crate::records::UsageRecord;
use crate::sets::{self, IndexSet};

/// Prefix length used to group IPv6 addresses before generic merging.
pub const IPV6_GROUP_PREFIX: u8 = 64;

/// A range and the records it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationEntry {
    pub range: AddressSpace,
    pub covered: IndexSet,
}

/// An aggregated range with the activity of the records it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub range: AddressSpace,
    /// Indices into the record list passed to [`RangeAggregator::aggregate`].
    pub covered: IndexSet,
    pub action_count: u64,
    pub all_action_count: u64,
    pub users: BTreeSet<String>,
    /// Covered record indices in address order; only set for CIDR ranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationLevel {
    pub ranges: Vec<RangeSummary>,
}

impl AggregationLevel {
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Levels from most granular (index 0) to most general.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub version: IpVersion,
    pub levels: Vec<AggregationLevel>,
}

impl AggregationResult {
    pub fn most_general(&self) -> Option<&AggregationLevel> {
        self.levels.last()
    }
}

/// Builds aggregation levels under a prefix-length policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeAggregator {
    policy: PrefixPolicy,
}

impl RangeAggregator {
    pub fn new(policy: PrefixPolicy) -> Self {
        Self { policy }
    }

    /// Aggregate usage records into generalization levels.
    ///
    /// Records must be non-empty and share one IP version. Records are
    /// processed in address order, so any permutation of the same records
    /// yields the same ranges.
    pub fn aggregate(&self, records: &[UsageRecord]) -> Result<AggregationResult, IpaggError> {
        let version = check_records(records)?;

        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|&a, &b| {
            records[a]
                .address()
                .cmp(records[b].address())
                .then(a.cmp(&b))
        });
        let addresses: Vec<AddressSpace> = order.iter().map(|&i| *records[i].address()).collect();

        let mut levels = vec![initial_level(&addresses)];
        if version == IpVersion::V6 {
            let grouped = group_by_prefix(&addresses, IPV6_GROUP_PREFIX);
            if !grouped.is_empty() {
                levels.push(grouped);
            }
        }

        let max_passes = usize::from(version.bits());
        let mut passes = 0;
        loop {
            if passes == max_passes {
                debug!("Stopping after {} generalization passes", passes);
                break;
            }
            passes += 1;

            let next = self.generalize(&levels, &addresses);
            if next.is_empty() || levels.last() == Some(&next) {
                break;
            }
            debug!("Built level {} with {} ranges", levels.len(), next.len());
            levels.push(next);
        }

        let levels = levels
            .into_iter()
            .map(|level| summarize(level, &order, records))
            .collect();

        Ok(AggregationResult { version, levels })
    }

    /// Build one level from the last level in `levels`.
    fn generalize(
        &self,
        levels: &[Vec<AggregationEntry>],
        addresses: &[AddressSpace],
    ) -> Vec<AggregationEntry> {
        let Some(current) = levels.last() else {
            return Vec::new();
        };

        let mut next: Vec<AggregationEntry> = Vec::new();
        let mut seen: HashSet<AddressSpace> = HashSet::new();
        let mut isolated: Vec<&AggregationEntry> = Vec::new();

        for (i, a) in current.iter().enumerate() {
            for b in &current[i + 1..] {
                let Some(range) = a.range.common_covering_range(&b.range, &self.policy) else {
                    for entry in [a, b] {
                        if !isolated
                            .iter()
                            .any(|known| sets::equal(&known.covered, &entry.covered))
                        {
                            isolated.push(entry);
                        }
                    }
                    continue;
                };
                if !seen.insert(range) {
                    continue;
                }

                // A candidate can cover more than its two sources.
                let covered: IndexSet = addresses
                    .iter()
                    .enumerate()
                    .filter(|(_, address)| range.contains(address, false))
                    .map(|(idx, _)| idx)
                    .collect();
                place(
                    AggregationEntry { range, covered },
                    levels,
                    &mut next,
                    &mut seen,
                );
            }
        }

        for entry in isolated {
            let represented = next
                .iter()
                .any(|e| sets::equal(&e.covered, &entry.covered));
            let swallowed = next
                .iter()
                .any(|e| sets::is_superset_of(&e.covered, &entry.covered, true));
            if !represented && !swallowed {
                next.push(entry.clone());
            }
        }

        next.sort_by(|a, b| a.range.cmp(&b.range));
        next
    }
}

/// Insert a candidate into the level being built.
///
/// Earlier accepted entries win: a candidate broader than an accepted entry is
/// dropped and its extra records recovered from earlier levels; a candidate
/// narrower than an accepted entry replaces it and the records it no longer
/// covers are recovered the same way.
fn place(
    candidate: AggregationEntry,
    levels: &[Vec<AggregationEntry>],
    next: &mut Vec<AggregationEntry>,
    seen: &mut HashSet<AddressSpace>,
) {
    if let Some(pos) = next
        .iter()
        .position(|e| sets::is_superset_of(&candidate.covered, &e.covered, true))
    {
        let extra = sets::difference(&candidate.covered, &next[pos].covered);
        overflow::resolve(levels, &extra, seen, next);
    } else if let Some(pos) = next
        .iter()
        .position(|e| sets::is_superset_of(&e.covered, &candidate.covered, true))
    {
        let extra = sets::difference(&next[pos].covered, &candidate.covered);
        next[pos] = candidate;
        overflow::resolve(levels, &extra, seen, next);
    } else {
        next.push(candidate);
    }
}

fn check_records(records: &[UsageRecord]) -> Result<IpVersion, IpaggError> {
    let first = records.first().ok_or(IpaggError::EmptyInput)?;
    let expected = first.address().version();
    for record in records {
        let address = record.address();
        if address.version() != expected {
            return Err(IpaggError::MixedVersions {
                expected: expected.number(),
                found: address.version().number(),
                address: address.canonical_string(),
            });
        }
        if address.is_range() {
            return Err(IpaggError::RangeNotAddress(address.canonical_string()));
        }
    }
    Ok(expected)
}

fn initial_level(addresses: &[AddressSpace]) -> Vec<AggregationEntry> {
    addresses
        .iter()
        .enumerate()
        .map(|(idx, address)| AggregationEntry {
            range: *address,
            covered: IndexSet::from([idx]),
        })
        .collect()
}

fn group_by_prefix(addresses: &[AddressSpace], prefix_len: u8) -> Vec<AggregationEntry> {
    let mut groups: BTreeMap<AddressSpace, IndexSet> = BTreeMap::new();
    for (idx, address) in addresses.iter().enumerate() {
        match address.range_at_prefix(prefix_len) {
            Ok(range) => {
                groups.entry(range).or_default().insert(idx);
            }
            Err(e) => {
                warn!("Skipping {} in /{} grouping: {}", address, prefix_len, e);
            }
        }
    }
    groups
        .into_iter()
        .map(|(range, covered)| AggregationEntry { range, covered })
        .collect()
}

/// Map internal indices back to caller positions and total up activity.
fn summarize(
    level: Vec<AggregationEntry>,
    order: &[usize],
    records: &[UsageRecord],
) -> AggregationLevel {
    let ranges = level
        .into_iter()
        .map(|entry| {
            let positions: Vec<usize> = entry.covered.iter().map(|&i| order[i]).collect();
            let action_count = positions
                .iter()
                .fold(0u64, |acc, &p| acc.saturating_add(records[p].action_count()));
            let all_action_count = positions
                .iter()
                .fold(0u64, |acc, &p| acc.saturating_add(records[p].all_action_count()));
            let users = positions
                .iter()
                .flat_map(|&p| records[p].users().iter().cloned())
                .collect();
            RangeSummary {
                range: entry.range,
                covered: positions.iter().copied().collect(),
                action_count,
                all_action_count,
                users,
                members: entry.range.is_range().then_some(positions),
            }
        })
        .collect();
    AggregationLevel { ranges }
}
