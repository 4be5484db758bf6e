use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset of candidate pattern ids
///
/// Ids are 0-based catalog positions. Iteration is in ascending id order,
/// which is also the catalog order, so the n-th member is well defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternSet {
    bits: BitVec,
}

impl PatternSet {
    /// Create a set with no patterns present
    pub fn new(max_patterns: usize) -> Self {
        Self {
            bits: bitvec![0; max_patterns],
        }
    }

    /// Create a set containing every catalog id
    pub fn all(max_patterns: usize) -> Self {
        Self {
            bits: bitvec![1; max_patterns],
        }
    }

    /// Number of ids the set can hold
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert an id; ids past the capacity are ignored
    pub fn insert(&mut self, id: usize) {
        if id < self.bits.len() {
            self.bits.set(id, true);
        }
    }

    /// Remove an id
    pub fn remove(&mut self, id: usize) {
        if id < self.bits.len() {
            self.bits.set(id, false);
        }
    }

    /// Test id membership
    pub fn contains(&self, id: usize) -> bool {
        self.bits.get(id).as_deref() == Some(&true)
    }

    /// Test if no ids are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count ids in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// The `n`-th id in ascending order
    pub fn nth(&self, n: usize) -> Option<usize> {
        self.bits.iter_ones().nth(n)
    }

    /// Keep only the ids accepted by `keep`, returning how many were removed
    pub fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) -> usize {
        let doomed: Vec<usize> = self.bits.iter_ones().filter(|&id| !keep(id)).collect();
        for &id in &doomed {
            self.bits.set(id, false);
        }
        doomed.len()
    }

    /// Remove every id
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Extract all ids as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatternSet({} patterns: {:?})", self.count(), self.to_vec())
    }
}
