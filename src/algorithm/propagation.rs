use crate::{
    algorithm::cell::Cell,
    analysis::patterns::Pattern,
    io::configuration::Propagation,
    spatial::grid::{
        Direction, GridSize, index_to_position, neighbour, position_to_index,
    },
};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Shape of the solver grid and whether its edges wrap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Topology {
    /// Grid size in cells
    pub size: GridSize,
    /// Off-grid neighbours wrap to the opposite side
    pub wrap: bool,
}

impl Topology {
    /// Create a topology
    pub const fn new(size: GridSize, wrap: bool) -> Self {
        Self { size, wrap }
    }

    /// Neighbours of a linear index, in `Direction::ALL` order
    pub fn neighbours(&self, index: usize) -> impl Iterator<Item = (Direction, usize)> + use<> {
        let Self { size, wrap } = *self;
        let position = index_to_position(index, size);
        Direction::ALL.into_iter().filter_map(move |direction| {
            position
                .and_then(|position| neighbour(position, direction, size, wrap))
                .map(|found| (direction, position_to_index(found, size)))
        })
    }
}

/// Prune the four direct neighbours of a collapsed cell
///
/// Every candidate of an undetermined neighbour whose facing edge differs
/// from the collapsed cell's own edge is removed. Collapsed neighbours are
/// left alone. Returns the number of candidates removed.
pub fn collapse_neighbours(
    cells: &mut [Cell],
    index: usize,
    patterns: &[Arc<Pattern>],
    topology: Topology,
) -> usize {
    let Some(source) = cells.get(index).and_then(|cell| cell.pattern().cloned()) else {
        return 0;
    };

    topology
        .neighbours(index)
        .map(|(direction, target)| {
            let own_edge = source.signature().edge(direction);
            prune(cells, target, patterns, direction, |edge| edge == own_edge)
        })
        .sum()
}

/// Propagate from a collapsed cell with the requested reach
///
/// `Local` is a single [`collapse_neighbours`] pass. `Cascading` keeps
/// pruning outward from every cell whose candidates shrank, until no set
/// changes. Returns the number of candidates removed.
pub fn propagate(
    cells: &mut [Cell],
    index: usize,
    patterns: &[Arc<Pattern>],
    topology: Topology,
    mode: Propagation,
) -> usize {
    match mode {
        Propagation::Local => collapse_neighbours(cells, index, patterns, topology),
        Propagation::Cascading => cascade(cells, index, patterns, topology),
    }
}

fn cascade(
    cells: &mut [Cell],
    index: usize,
    patterns: &[Arc<Pattern>],
    topology: Topology,
) -> usize {
    let mut queue = VecDeque::from([index]);
    let mut queued = HashSet::from([index]);
    let mut removed = 0;

    while let Some(current) = queue.pop_front() {
        queued.remove(&current);

        for (direction, target) in topology.neighbours(current) {
            // A contradicted cell allows nothing and would wipe its neighbours
            let Some(allowed) = allowed_edges(cells, current, patterns, direction) else {
                continue;
            };
            let pruned = prune(cells, target, patterns, direction, |edge| {
                allowed.contains(&edge)
            });
            if pruned > 0 {
                removed += pruned;
                if queued.insert(target) {
                    queue.push_back(target);
                }
            }
        }
    }

    removed
}

/// Edge values a cell can present towards `direction`
///
/// `None` for undetermined cells with no candidate left.
fn allowed_edges(
    cells: &[Cell],
    index: usize,
    patterns: &[Arc<Pattern>],
    direction: Direction,
) -> Option<HashSet<u64>> {
    let cell = cells.get(index)?;
    if let Some(pattern) = cell.pattern() {
        return Some(HashSet::from([pattern.signature().edge(direction)]));
    }
    if cell.candidates().is_empty() {
        return None;
    }
    Some(
        cell.candidates()
            .iter()
            .filter_map(|id| patterns.get(id))
            .map(|pattern| pattern.signature().edge(direction))
            .collect(),
    )
}

/// Remove candidates of `target` whose edge facing back is rejected
fn prune(
    cells: &mut [Cell],
    target: usize,
    patterns: &[Arc<Pattern>],
    direction: Direction,
    accepts: impl Fn(u64) -> bool,
) -> usize {
    let facing = direction.opposite();
    match cells.get_mut(target) {
        Some(cell) if !cell.is_collapsed() => cell.candidates_mut().retain(|id| {
            patterns
                .get(id)
                .is_some_and(|pattern| accepts(pattern.signature().edge(facing)))
        }),
        _ => 0,
    }
}

/// Whether every collapsed pair of neighbours agrees on its shared edge
pub fn is_consistent(cells: &[Cell], topology: Topology) -> bool {
    cells.iter().enumerate().all(|(index, cell)| {
        let Some(pattern) = cell.pattern() else {
            return true;
        };
        topology.neighbours(index).all(|(direction, target)| {
            cells
                .get(target)
                .and_then(Cell::pattern)
                .is_none_or(|other| pattern.signature().compatible(other.signature(), direction))
        })
    })
}
