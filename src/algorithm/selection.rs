use crate::algorithm::cell::Cell;
use crate::io::error::{Result, WfcError};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random selector for reproducible stochastic choices
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a selector seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Uniform index in `0..len`, `None` when `len` is zero
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }
}

/// Pick the next cell to collapse
///
/// Considers undetermined cells that still have candidates, keeps those with
/// the fewest and breaks ties uniformly at random. Returns the cell's linear
/// index.
///
/// # Errors
///
/// Returns `NoCandidate` if no undetermined cell has a candidate left
pub fn next_candidate(cells: &[Cell], selector: &mut RandomSelector) -> Result<usize> {
    let open = || {
        cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_collapsed() && !cell.candidates().is_empty())
    };

    let fewest = open().map(|(_, cell)| cell.candidate_count()).min();
    let tied: Vec<usize> = fewest.map_or_else(Vec::new, |fewest| {
        open()
            .filter(|(_, cell)| cell.candidate_count() == fewest)
            .map(|(index, _)| index)
            .collect()
    });

    selector
        .index(tied.len())
        .and_then(|choice| tied.get(choice).copied())
        .ok_or_else(|| WfcError::NoCandidate {
            attempt: 0,
            undetermined: cells.iter().filter(|cell| !cell.is_collapsed()).count(),
        })
}
