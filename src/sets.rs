//! Set predicates over record index sets.

use std::collections::BTreeSet;

/// Indices into the caller's record list.
pub type IndexSet = BTreeSet<usize>;

/// True if `a` contains every element of `b`; with `proper`, `a` must also be
/// strictly larger.
pub fn is_superset_of(a: &IndexSet, b: &IndexSet, proper: bool) -> bool {
    if proper && a.len() <= b.len() {
        return false;
    }
    if b.len() > a.len() {
        return false;
    }
    b.iter().all(|i| a.contains(i))
}

pub fn is_subset_of(a: &IndexSet, b: &IndexSet, proper: bool) -> bool {
    is_superset_of(b, a, proper)
}

/// Elements of `a` absent from `b`.
pub fn difference(a: &IndexSet, b: &IndexSet) -> IndexSet {
    a.difference(b).copied().collect()
}

pub fn equal(a: &IndexSet, b: &IndexSet) -> bool {
    a == b
}
