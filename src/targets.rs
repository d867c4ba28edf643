//! Selection lists of accounts, addresses and ranges.
//!
//! [`reduce`] drops addresses and ranges already covered by a broader selected
//! range. [`categorize`] splits a selection into accounts, temporary accounts
//! and IP entries, and annotates which IP entries contain one another.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::address::AddressSpace;

/// A raw selection string and its parsed address, if it is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEntry {
    pub raw: String,
    pub address: Option<AddressSpace>,
}

impl TargetEntry {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let address = AddressSpace::parse(&raw).ok();
        Self { raw, address }
    }

    pub fn is_address(&self) -> bool {
        self.address.is_some()
    }
}

/// A selected address or range with its containment relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpTarget {
    pub raw: String,
    pub address: AddressSpace,
    /// Canonical forms of other selected entries this one strictly contains.
    pub covers: Vec<String>,
    /// Canonical forms of other selected entries strictly containing this one.
    pub covered_by: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Categorized {
    pub users: Vec<String>,
    pub temporary_users: Vec<String>,
    pub ip_entries: Vec<IpTarget>,
}

/// Remove addresses and ranges strictly contained in another selected range.
///
/// Returns a subsequence of `selected` in input order. Strings that are not
/// addresses are always kept.
///
/// # Examples
/// ```
/// use ipagg::targets::reduce;
/// let reduced = reduce(&["10.0.0.0/24", "10.0.0.5", "example-user"]);
/// assert_eq!(reduced, vec!["10.0.0.0/24", "example-user"]);
/// ```
pub fn reduce<S: AsRef<str>>(selected: &[S]) -> Vec<String> {
    let mut parsed: HashMap<&str, Option<AddressSpace>> = HashMap::new();
    let mut accepted: Vec<(usize, AddressSpace)> = Vec::new();
    let mut keep = vec![false; selected.len()];

    for (idx, raw) in selected.iter().enumerate() {
        let raw = raw.as_ref();
        let address = *parsed
            .entry(raw)
            .or_insert_with(|| AddressSpace::parse(raw).ok());
        let Some(candidate) = address else {
            keep[idx] = true;
            continue;
        };

        if accepted
            .iter()
            .any(|(_, range)| range.contains(&candidate, true))
        {
            continue;
        }
        accepted.retain(|(_, range)| !candidate.contains(range, true));
        accepted.push((idx, candidate));
    }

    for (idx, _) in accepted {
        keep[idx] = true;
    }

    selected
        .iter()
        .zip(keep)
        .filter(|(_, kept)| *kept)
        .map(|(raw, _)| raw.as_ref().to_string())
        .collect()
}

/// Split a selection into accounts, temporary accounts and IP entries.
///
/// IP entries are deduplicated by canonical form (first occurrence wins) and
/// annotated with strict containment against the other IP entries. Account
/// groups are deduplicated and sorted in reverse lexicographic order. Blank
/// strings are ignored.
pub fn categorize<S, F>(selected: &[S], is_temporary: F) -> Categorized
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let mut users = BTreeSet::new();
    let mut temporary_users = BTreeSet::new();
    let mut ip_entries: Vec<IpTarget> = Vec::new();

    for raw in selected {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            continue;
        }
        match TargetEntry::new(raw) {
            TargetEntry {
                raw,
                address: Some(address),
            } => {
                if !ip_entries.iter().any(|e| e.address == address) {
                    ip_entries.push(IpTarget {
                        raw,
                        address,
                        covers: Vec::new(),
                        covered_by: Vec::new(),
                    });
                }
            }
            TargetEntry { raw, address: None } if is_temporary(raw.as_str()) => {
                temporary_users.insert(raw);
            }
            TargetEntry { raw, address: None } => {
                users.insert(raw);
            }
        }
    }

    let addresses: Vec<AddressSpace> = ip_entries.iter().map(|e| e.address).collect();
    for entry in &mut ip_entries {
        entry.covers = addresses
            .iter()
            .filter(|other| entry.address.contains(other, true))
            .map(AddressSpace::canonical_string)
            .collect();
        entry.covered_by = addresses
            .iter()
            .filter(|other| other.contains(&entry.address, true))
            .map(AddressSpace::canonical_string)
            .collect();
    }

    Categorized {
        users: users.into_iter().rev().collect(),
        temporary_users: temporary_users.into_iter().rev().collect(),
        ip_entries,
    }
}

/// Predicate matching account names that start with `prefix`.
pub fn temporary_prefix(prefix: &str) -> impl Fn(&str) -> bool + '_ {
    move |name: &str| !prefix.is_empty() && name.starts_with(prefix)
}
