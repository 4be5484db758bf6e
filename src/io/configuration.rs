//! Solver constants and runtime configuration

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::grid::GridSize;

/// Number of pixels sampled along each tile edge when fingerprinting
pub const DEFAULT_EDGE_SAMPLES: usize = 3;

/// Fewest samples that still give a defined spacing along an edge
pub const MIN_EDGE_SAMPLES: usize = 2;

/// Default number of outer solve attempts
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default edge length of one tile in a PNG tile sheet
pub const DEFAULT_TILE_PIXELS: u32 = 16;

/// Saved-state marker for a cell that was not collapsed
pub const UNSET_PATTERN_ID: i64 = -1;

// Output settings
/// Suffix added to generated file names
pub const OUTPUT_SUFFIX: &str = "_wfc";
/// Extension of saved-state files
pub const STATE_EXTENSION: &str = "json";

/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// What the solve loop does with the grid after a contradiction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Keep the grid as it is and start the next attempt from there
    #[default]
    InPlace,
    /// Restore the grid to its state at the start of the solve call
    Reset,
}

/// How far candidate pruning travels from a collapsed cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Prune the four direct neighbours only
    #[default]
    Local,
    /// Keep pruning outward from every cell whose candidates shrank
    Cascading,
}

/// Parameters for reading, pattern extraction and solving
#[derive(Clone, Copy, Debug)]
pub struct WfcConfig {
    /// Output size in tiles; must be a multiple of `pattern_size`
    pub output_size: GridSize,
    /// Pattern block size in tiles
    pub pattern_size: GridSize,
    /// Slide the extraction window one tile at a time instead of a full block
    pub overlapping: bool,
    /// Let extraction windows wrap around the input edges
    pub wrapping: bool,
    /// Maximum number of outer solve attempts
    pub max_iterations: usize,
    /// Pixels sampled per tile edge
    pub edge_samples: usize,
    /// Seed for the solver's random generator (`None` draws from the OS)
    pub seed: Option<u64>,
    /// Behaviour after a contradiction
    pub retry_policy: RetryPolicy,
    /// Propagation reach
    pub propagation: Propagation,
    /// Treat the output grid as a torus when propagating
    pub wrap_output: bool,
}

impl Default for WfcConfig {
    fn default() -> Self {
        Self {
            output_size: GridSize::new(16, 16),
            pattern_size: GridSize::new(1, 1),
            overlapping: false,
            wrapping: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            edge_samples: DEFAULT_EDGE_SAMPLES,
            seed: Some(DEFAULT_SEED),
            retry_policy: RetryPolicy::InPlace,
            propagation: Propagation::Local,
            wrap_output: true,
        }
    }
}

impl WfcConfig {
    /// Check every parameter against its allowed range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if:
    /// - A pattern or output dimension is zero
    /// - The output size is not a multiple of the pattern size on either axis
    /// - `max_iterations` is zero
    /// - `edge_samples` is below [`MIN_EDGE_SAMPLES`]
    pub fn validate(&self) -> Result<()> {
        validate_pattern_size(self.pattern_size)?;

        if self.output_size.is_empty() {
            return Err(invalid_parameter(
                "output_size",
                &self.output_size,
                &"both dimensions must be greater than zero",
            ));
        }

        if self.output_size.width % self.pattern_size.width != 0
            || self.output_size.height % self.pattern_size.height != 0
        {
            return Err(invalid_parameter(
                "output_size",
                &self.output_size,
                &format!("must be a multiple of the pattern size {}", self.pattern_size),
            ));
        }

        if self.max_iterations == 0 {
            return Err(invalid_parameter(
                "max_iterations",
                &self.max_iterations,
                &"at least one solve attempt is required",
            ));
        }

        validate_edge_samples(self.edge_samples)
    }

    /// Settings the solver session needs
    pub const fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_iterations: self.max_iterations,
            seed: self.seed,
            retry_policy: self.retry_policy,
            propagation: self.propagation,
            wrap_output: self.wrap_output,
        }
    }

    /// Size of the solver's cell grid (output size in patterns)
    pub const fn cell_grid_size(&self) -> GridSize {
        GridSize::new(
            self.output_size.width / self.pattern_size.width,
            self.output_size.height / self.pattern_size.height,
        )
    }
}

/// Per-session solver settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of outer solve attempts
    pub max_iterations: usize,
    /// Seed for the session's random generator (`None` draws from the OS)
    pub seed: Option<u64>,
    /// Behaviour after a contradiction
    pub retry_policy: RetryPolicy,
    /// Propagation reach
    pub propagation: Propagation,
    /// Off-grid neighbours wrap to the opposite side
    pub wrap_output: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        WfcConfig::default().solver_config()
    }
}

/// Reject pattern sizes with a zero dimension
///
/// # Errors
///
/// Returns `InvalidParameter` if either dimension is zero
pub fn validate_pattern_size(pattern_size: GridSize) -> Result<()> {
    if pattern_size.is_empty() {
        return Err(invalid_parameter(
            "pattern_size",
            &pattern_size,
            &"both dimensions must be greater than zero",
        ));
    }
    Ok(())
}

/// Reject sample counts that leave the edge spacing undefined
///
/// # Errors
///
/// Returns `InvalidParameter` if `samples` is below [`MIN_EDGE_SAMPLES`]
pub fn validate_edge_samples(samples: usize) -> Result<()> {
    if samples < MIN_EDGE_SAMPLES {
        return Err(invalid_parameter(
            "edge_samples",
            &samples,
            &format!("at least {MIN_EDGE_SAMPLES} samples per edge are required"),
        ));
    }
    Ok(())
}
