//! Solver grid slot

use crate::algorithm::bitset::PatternSet;
use crate::analysis::patterns::Pattern;
use crate::spatial::grid::GridPosition;
use std::fmt;
use std::sync::Arc;

/// One slot of the solver grid
///
/// Either undetermined, holding the ids of the patterns it may still take,
/// or collapsed to exactly one pattern with an empty candidate set.
#[derive(Clone, Debug)]
pub struct Cell {
    position: GridPosition,
    candidates: PatternSet,
    pattern: Option<Arc<Pattern>>,
}

impl Cell {
    /// Undetermined cell allowing every one of `pattern_count` patterns
    pub fn new(position: GridPosition, pattern_count: usize) -> Self {
        Self {
            position,
            candidates: PatternSet::all(pattern_count),
            pattern: None,
        }
    }

    /// Cell already collapsed to `pattern`
    pub fn collapsed(position: GridPosition, pattern: Arc<Pattern>, pattern_count: usize) -> Self {
        Self {
            position,
            candidates: PatternSet::new(pattern_count),
            pattern: Some(pattern),
        }
    }

    /// Grid position
    pub const fn position(&self) -> GridPosition {
        self.position
    }

    /// Whether the cell holds a pattern
    pub const fn is_collapsed(&self) -> bool {
        self.pattern.is_some()
    }

    /// Resolved pattern
    pub const fn pattern(&self) -> Option<&Arc<Pattern>> {
        self.pattern.as_ref()
    }

    /// Id of the resolved pattern
    pub fn pattern_id(&self) -> Option<usize> {
        self.pattern.as_ref().map(|pattern| pattern.id())
    }

    /// Remaining candidate ids
    pub const fn candidates(&self) -> &PatternSet {
        &self.candidates
    }

    /// Number of remaining candidates
    pub fn candidate_count(&self) -> usize {
        self.candidates.count()
    }

    /// Undetermined with no candidate left
    pub fn is_contradiction(&self) -> bool {
        !self.is_collapsed() && self.candidates.is_empty()
    }

    pub(crate) const fn candidates_mut(&mut self) -> &mut PatternSet {
        &mut self.candidates
    }

    /// Commit to a pattern and drop every candidate
    pub(crate) fn commit(&mut self, pattern: Arc<Pattern>) {
        self.pattern = Some(pattern);
        self.candidates.clear();
    }

    /// Back to undetermined with the full catalog
    pub(crate) fn reset(&mut self, pattern_count: usize) {
        self.pattern = None;
        self.candidates = PatternSet::all(pattern_count);
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Some(pattern) => write!(f, "{} = {pattern}", self.position),
            None => write!(f, "{} ? {}", self.position, self.candidates.count()),
        }
    }
}
