//! Solver session: cell grid, pattern catalog and random generator
//!
//! Every operation takes `&mut self`, so a session is edited from one place
//! at a time. The solve loop repeats whole passes of select, collapse and
//! propagate; a pass that runs out of candidates is a contradiction, which is
//! logged and retried until the attempt budget is spent.

use crate::{
    algorithm::{
        cell::Cell,
        propagation::{Topology, propagate},
        selection::{RandomSelector, next_candidate},
    },
    analysis::patterns::Pattern,
    io::{
        configuration::{RetryPolicy, SolverConfig, UNSET_PATTERN_ID},
        error::{Result, WfcError, WithContext, invalid_parameter},
        saved_state::SavedState,
    },
    spatial::{
        grid::{GridPosition, GridSize, index_to_position, position_to_index},
        tiles::Tile,
    },
};
use ndarray::Array2;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Overall state of the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveState {
    /// Cells remain undetermined and attempts remain
    Solving,
    /// Every cell is collapsed
    Solved,
    /// The attempt budget ran out with cells still undetermined
    Exhausted,
}

impl fmt::Display for SolveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solving => write!(f, "solving"),
            Self::Solved => write!(f, "solved"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Outcome of a solve call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveReport {
    /// Grid state when the call returned
    pub state: SolveState,
    /// Attempts started
    pub attempts: usize,
    /// Attempts that ended in a contradiction
    pub contradictions: usize,
}

/// Progress after one collapse inside a solve call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveProgress {
    /// Current attempt, starting at 1
    pub attempt: usize,
    /// Cell that was just collapsed
    pub position: GridPosition,
    /// Collapsed cells so far
    pub collapsed: usize,
    /// Total number of cells
    pub total: usize,
}

/// Wave function collapse session over a fixed cell grid
pub struct CoreSolver {
    patterns: Vec<Arc<Pattern>>,
    cells: Vec<Cell>,
    topology: Topology,
    config: SolverConfig,
    selector: RandomSelector,
    state: SolveState,
}

impl CoreSolver {
    /// Create a session with every cell allowing every pattern
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `patterns` is empty
    /// - Pattern ids do not match their positions
    /// - Patterns differ in block size
    /// - `size` has a zero dimension or `max_iterations` is zero
    pub fn new(patterns: Vec<Arc<Pattern>>, size: GridSize, config: SolverConfig) -> Result<Self> {
        let Some(first) = patterns.first() else {
            return Err(WfcError::EmptyInput);
        };
        let block = first.size();

        if let Some(pattern) = patterns
            .iter()
            .enumerate()
            .find_map(|(index, pattern)| (pattern.id() != index).then_some(pattern))
        {
            return Err(WfcError::InvalidSourceData {
                reason: format!("pattern {pattern} is out of catalog order"),
            });
        }
        if let Some(pattern) = patterns.iter().find(|pattern| pattern.size() != block) {
            return Err(WfcError::InvalidSourceData {
                reason: format!("pattern {pattern} does not match block size {block}"),
            });
        }
        if size.is_empty() {
            return Err(invalid_parameter(
                "size",
                &size,
                &"both dimensions must be greater than zero",
            ));
        }
        if config.max_iterations == 0 {
            return Err(invalid_parameter(
                "max_iterations",
                &config.max_iterations,
                &"at least one solve attempt is required",
            ));
        }

        let selector = config
            .seed
            .map_or_else(RandomSelector::from_os_rng, RandomSelector::new);
        let cells = fresh_cells(size, patterns.len());

        Ok(Self {
            patterns,
            cells,
            topology: Topology::new(size, config.wrap_output),
            config,
            selector,
            state: SolveState::Solving,
        })
    }

    /// Grid size in cells
    pub const fn size(&self) -> GridSize {
        self.topology.size
    }

    /// Pattern catalog
    pub fn patterns(&self) -> &[Arc<Pattern>] {
        &self.patterns
    }

    /// Session settings
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Cells in linear order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell by linear index
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Cell by position
    pub fn cell_at(&self, position: GridPosition) -> Option<&Cell> {
        self.index_of(position).and_then(|index| self.cells.get(index))
    }

    /// Snapshot of the grid, `grid[[y, x]]` is the cell at `(x, y)`
    pub fn grid(&self) -> Array2<Cell> {
        let size = self.size();
        let count = self.patterns.len();
        Array2::from_shape_fn(size.shape(), |(y, x)| {
            let position = GridPosition::new(x, y);
            self.cells
                .get(position_to_index(position, size))
                .cloned()
                .unwrap_or_else(|| Cell::new(position, count))
        })
    }

    /// Current grid state
    pub const fn state(&self) -> SolveState {
        self.state
    }

    /// Number of collapsed cells
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_collapsed()).count()
    }

    /// Whether every cell is collapsed
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(Cell::is_collapsed)
    }

    /// Restart the random generator from a seed
    pub fn reseed(&mut self, seed: u64) {
        self.selector = RandomSelector::new(seed);
    }

    /// Commit one cell to a pattern without propagating
    ///
    /// Does nothing if the cell is already collapsed. A single remaining
    /// candidate is taken as is; otherwise `pattern_index` picks from the
    /// candidates in ascending id order, or a uniform random pick is made.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `index` is outside the grid
    /// - `pattern_index` is past the last candidate
    /// - The cell has no candidate left
    pub fn collapse(&mut self, index: usize, pattern_index: Option<usize>) -> Result<()> {
        let undetermined = self.cells.len() - self.collapsed_count();
        let Some(cell) = self.cells.get(index) else {
            return Err(invalid_parameter("index", &index, &"outside the cell grid"));
        };
        if cell.is_collapsed() {
            return Ok(());
        }

        let count = cell.candidate_count();
        let choice = match (count, pattern_index) {
            (0, _) => {
                return Err(WfcError::NoCandidate {
                    attempt: 0,
                    undetermined,
                });
            }
            (1, _) => 0,
            (_, Some(choice)) if choice < count => choice,
            (_, Some(choice)) => {
                return Err(invalid_parameter(
                    "pattern_index",
                    &choice,
                    &format!("cell has {count} candidates"),
                ));
            }
            (_, None) => self.selector.index(count).unwrap_or_default(),
        };

        let pattern = cell
            .candidates()
            .nth(choice)
            .and_then(|id| self.patterns.get(id))
            .cloned()
            .ok_or_else(|| WfcError::InvalidSourceData {
                reason: format!("cell {index} references a pattern outside the catalog"),
            })?;

        if let Some(cell) = self.cells.get_mut(index) {
            cell.commit(pattern);
        }
        self.refresh_state();
        Ok(())
    }

    /// Prune the neighbours of a collapsed cell
    ///
    /// Uses the session's propagation reach. Returns the number of candidates
    /// removed; undetermined cells propagate nothing.
    pub fn collapse_neighbours(&mut self, index: usize) -> usize {
        propagate(
            &mut self.cells,
            index,
            &self.patterns,
            self.topology,
            self.config.propagation,
        )
    }

    /// Collapse the cell at `position` and propagate from it
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the grid or the collapse
    /// fails
    pub fn collapse_cell(
        &mut self,
        position: GridPosition,
        pattern_index: Option<usize>,
    ) -> Result<()> {
        let index = self
            .index_of(position)
            .ok_or_else(|| invalid_parameter("position", &position, &"outside the cell grid"))?;
        self.collapse(index, pattern_index)?;
        self.collapse_neighbours(index);
        Ok(())
    }

    /// Run one select, collapse and propagate cycle
    ///
    /// Returns the collapsed cell, or `None` when the grid was already solved.
    ///
    /// # Errors
    ///
    /// Returns `NoCandidate` if every undetermined cell has run out of
    /// candidates
    pub fn step(&mut self) -> Result<Option<GridPosition>> {
        if self.is_solved() {
            self.state = SolveState::Solved;
            return Ok(None);
        }

        let index = next_candidate(&self.cells, &mut self.selector)?;
        self.collapse(index, None)?;
        self.collapse_neighbours(index);
        Ok(index_to_position(index, self.size()))
    }

    /// Solve until every cell is collapsed or the attempt budget is spent
    ///
    /// # Errors
    ///
    /// Contradictions are logged and retried. Returns an error only for
    /// failures unrelated to candidate exhaustion.
    pub fn solve(&mut self) -> Result<SolveReport> {
        self.solve_observed(|_| {})
    }

    /// [`solve`](Self::solve), reporting progress after every collapse
    ///
    /// # Errors
    ///
    /// Same as [`solve`](Self::solve)
    pub fn solve_observed(&mut self, mut observer: impl FnMut(SolveProgress)) -> Result<SolveReport> {
        let snapshot = (self.config.retry_policy == RetryPolicy::Reset).then(|| self.cells.clone());
        let total = self.cells.len();
        let mut contradictions = 0;

        for attempt in 1..=self.config.max_iterations {
            debug!(attempt, collapsed = self.collapsed_count(), "starting solve attempt");

            match self.run_pass(attempt, total, &mut observer) {
                Ok(()) => {
                    self.state = SolveState::Solved;
                    info!(attempt, contradictions, cells = total, "grid solved");
                    return Ok(SolveReport {
                        state: self.state,
                        attempts: attempt,
                        contradictions,
                    });
                }
                Err(error) if error.is_contradiction() => {
                    contradictions += 1;
                    warn!(
                        attempt,
                        undetermined = total - self.collapsed_count(),
                        error = %error,
                        "contradiction during solve"
                    );
                    if let Some(cells) = &snapshot {
                        self.cells.clone_from(cells);
                        debug!(attempt, "grid reset to its starting state");
                    }
                }
                Err(error) => return Err(error),
            }
        }

        self.state = if self.is_solved() {
            SolveState::Solved
        } else {
            SolveState::Exhausted
        };
        info!(
            state = %self.state,
            attempts = self.config.max_iterations,
            contradictions,
            collapsed = self.collapsed_count(),
            cells = total,
            "solve finished"
        );

        Ok(SolveReport {
            state: self.state,
            attempts: self.config.max_iterations,
            contradictions,
        })
    }

    fn run_pass(
        &mut self,
        attempt: usize,
        total: usize,
        observer: &mut impl FnMut(SolveProgress),
    ) -> Result<()> {
        while let Some(position) = self.step().with_attempt(attempt)? {
            observer(SolveProgress {
                attempt,
                position,
                collapsed: self.collapsed_count(),
                total,
            });
        }
        Ok(())
    }

    /// Solve only the cells in `shape`
    ///
    /// Every other cell is collapsed to a single-tile filler built from
    /// `default_tile` and propagated from before the main loop, so cells on
    /// the shape's border must fit against the filler. The filler's id is the
    /// catalog length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the shape is empty or leaves the grid,
    /// otherwise the same as [`solve`](Self::solve)
    pub fn solve_shape(&mut self, shape: &[GridPosition], default_tile: Tile) -> Result<SolveReport> {
        if shape.is_empty() {
            return Err(invalid_parameter("shape", &"[]", &"shape has no cells"));
        }
        let mut inside = HashSet::with_capacity(shape.len());
        for &position in shape {
            let index = self
                .index_of(position)
                .ok_or_else(|| invalid_parameter("shape", &position, &"outside the cell grid"))?;
            inside.insert(index);
        }

        let count = self.patterns.len();
        let filler = Arc::new(Pattern::filler(default_tile, count));
        let size = self.size();

        self.cells = (0..size.area())
            .filter_map(|index| index_to_position(index, size).map(|position| (index, position)))
            .map(|(index, position)| {
                if inside.contains(&index) {
                    Cell::new(position, count)
                } else {
                    Cell::collapsed(position, Arc::clone(&filler), count)
                }
            })
            .collect();
        self.refresh_state();

        let filled: Vec<usize> = (0..self.cells.len())
            .filter(|index| !inside.contains(index))
            .collect();
        debug!(
            shape = inside.len(),
            filler = filled.len(),
            "pre-collapsed cells outside the shape"
        );
        for index in filled {
            self.collapse_neighbours(index);
        }

        self.solve()
    }

    /// Make a cell undetermined again with the full catalog
    ///
    /// Neighbours keep the candidates the cell's old pattern left them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the position is outside the grid
    pub fn reset_cell(&mut self, position: GridPosition) -> Result<()> {
        let count = self.patterns.len();
        let cell = self
            .index_of(position)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or_else(|| invalid_parameter("position", &position, &"outside the cell grid"))?;
        cell.reset(count);
        self.refresh_state();
        Ok(())
    }

    /// Make every cell undetermined with the full catalog
    pub fn reset(&mut self) {
        self.cells = fresh_cells(self.size(), self.patterns.len());
        self.state = SolveState::Solving;
        debug!(cells = self.cells.len(), "grid reset");
    }

    /// Snapshot the grid's pattern ids
    pub fn save(&self) -> SavedState {
        SavedState::from_cells(&self.cells)
    }

    /// Replay a snapshot as collapse and propagate, in cell order
    ///
    /// A cell already collapsed to the saved id is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The snapshot length differs from the cell count
    /// - A saved id is not a candidate of its cell
    pub fn restore(&mut self, saved: &SavedState) -> Result<()> {
        if saved.len() != self.cells.len() {
            return Err(invalid_parameter(
                "saved_state",
                &saved.len(),
                &format!("expected {} entries", self.cells.len()),
            ));
        }

        for (index, &entry) in saved.entries().iter().enumerate() {
            if entry == UNSET_PATTERN_ID {
                continue;
            }
            let unknown = || WfcError::UnknownPatternId { index, id: entry };
            let id = usize::try_from(entry).ok().ok_or_else(unknown)?;
            let cell = self.cells.get(index).ok_or_else(unknown)?;

            if let Some(current) = cell.pattern_id() {
                if current == id {
                    continue;
                }
                return Err(unknown());
            }

            let choice = cell
                .candidates()
                .iter()
                .position(|candidate| candidate == id)
                .ok_or_else(unknown)?;
            self.collapse(index, Some(choice))?;
            self.collapse_neighbours(index);
        }

        debug!(restored = saved.determined_count(), "restored saved state");
        Ok(())
    }

    fn index_of(&self, position: GridPosition) -> Option<usize> {
        let size = self.size();
        size.contains(position.x as i64, position.y as i64)
            .then(|| position_to_index(position, size))
    }

    fn refresh_state(&mut self) {
        self.state = if self.is_solved() {
            SolveState::Solved
        } else {
            SolveState::Solving
        };
    }
}

impl fmt::Debug for CoreSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreSolver")
            .field("size", &self.size())
            .field("patterns", &self.patterns.len())
            .field("collapsed", &self.collapsed_count())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn fresh_cells(size: GridSize, pattern_count: usize) -> Vec<Cell> {
    (0..size.area())
        .filter_map(|index| index_to_position(index, size))
        .map(|position| Cell::new(position, pattern_count))
        .collect()
}
