//! Command-line interface for synthesizing tilemaps from PNG tile sheets

use crate::algorithm::solver::{CoreSolver, SolveState};
use crate::analysis::input::InputReader;
use crate::analysis::patterns::PatternCatalog;
use crate::io::configuration::{
    DEFAULT_EDGE_SAMPLES, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, DEFAULT_TILE_PIXELS,
    OUTPUT_SUFFIX, Propagation, RetryPolicy, STATE_EXTENSION, WfcConfig,
};
use crate::io::error::{Result, WfcError};
use crate::io::image::{ImageTilemap, export_grid_as_png};
use crate::io::progress::ProgressManager;
use crate::io::saved_state::SavedState;
use crate::spatial::grid::GridSize;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info, warn};

#[derive(Parser, Debug)]
#[command(name = "tilecollapse")]
#[command(
    author,
    version,
    about = "Synthesize tilemaps from a sample tile sheet with wave function collapse"
)]
/// Command-line arguments for the tilemap generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG tile sheet or directory of sheets
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Edge length of one tile in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_PIXELS)]
    pub tile_pixels: u32,

    /// Pattern size in tiles, as WIDTHxHEIGHT
    #[arg(short, long, default_value = "1x1", value_parser = parse_size)]
    pub pattern_size: GridSize,

    /// Output size in tiles, as WIDTHxHEIGHT
    #[arg(short, long, default_value = "16x16", value_parser = parse_size)]
    pub output_size: GridSize,

    /// Slide the extraction window one tile at a time
    #[arg(long)]
    pub overlapping: bool,

    /// Let extraction windows wrap around the sheet edges
    #[arg(long)]
    pub wrapping: bool,

    /// Maximum solve attempts
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub iterations: usize,

    /// Pixels sampled per tile edge
    #[arg(short, long, default_value_t = DEFAULT_EDGE_SAMPLES)]
    pub edge_samples: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Restore the grid to its starting state after each contradiction
    #[arg(long)]
    pub reset_on_contradiction: bool,

    /// Keep propagating past the direct neighbours of a collapsed cell
    #[arg(long)]
    pub cascade: bool,

    /// Do not wrap the output grid around its edges when propagating
    #[arg(long)]
    pub bounded: bool,

    /// Resume from a saved state file
    #[arg(short, long, value_name = "STATE")]
    pub resume: Option<PathBuf>,

    /// Do not write a saved state next to the output image
    #[arg(long)]
    pub no_state: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Only log warnings and errors, hide progress
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every solve attempt
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level chosen by `--quiet` and `--verbose`
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Build and validate the generator configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if any value is out of range
    pub fn config(&self) -> Result<WfcConfig> {
        let config = WfcConfig {
            output_size: self.output_size,
            pattern_size: self.pattern_size,
            overlapping: self.overlapping,
            wrapping: self.wrapping,
            max_iterations: self.iterations,
            edge_samples: self.edge_samples,
            seed: Some(self.seed),
            retry_policy: if self.reset_on_contradiction {
                RetryPolicy::Reset
            } else {
                RetryPolicy::InPlace
            },
            propagation: if self.cascade {
                Propagation::Cascading
            } else {
                Propagation::Local
            },
            wrap_output: !self.bounded,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a `WIDTHxHEIGHT` size
///
/// # Errors
///
/// Returns a message if the text is not two positive integers joined by `x`
pub fn parse_size(text: &str) -> std::result::Result<GridSize, String> {
    let (width, height) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{text}'"))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid dimension '{value}': {e}"))
    };
    Ok(GridSize::new(parse(width)?, parse(height)?))
}

/// Orchestrates generation for each input sheet
pub struct FileProcessor {
    cli: Cli,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&self) -> Result<()> {
        let config = self.cli.config()?;
        let files = self.collect_files()?;

        if files.len() > 1 && self.cli.resume.is_some() {
            return Err(WfcError::InvalidParameter {
                parameter: "resume",
                value: format!("{} files", files.len()),
                reason: "a saved state can only resume a single file".to_string(),
            });
        }

        for file in &files {
            self.process_file(file, &config)?;
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_png(target) {
                return Err(not_a_png(target));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let entries = std::fs::read_dir(target).map_err(|e| WfcError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if is_png(&path) && !is_generated(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(not_a_png(target))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        if output_path(input_path, "png").exists() {
            info!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(&self, input_path: &Path, config: &WfcConfig) -> Result<()> {
        let start_time = Instant::now();

        let tilemap = ImageTilemap::from_png(input_path, self.cli.tile_pixels)?;
        let tiles = InputReader::new(&tilemap, config.edge_samples).read_tilemap()?;
        let catalog = PatternCatalog::extract(
            &tiles,
            config.pattern_size,
            config.overlapping,
            config.wrapping,
        )?;
        info!(
            input = %input_path.display(),
            tiles = %tiles.size(),
            assets = tiles.asset_count(),
            patterns = catalog.len(),
            "extracted patterns"
        );

        let mut solver = CoreSolver::new(
            catalog.into_patterns(),
            config.cell_grid_size(),
            config.solver_config(),
        )?;

        if let Some(resume) = &self.cli.resume {
            let saved = SavedState::load(resume)?;
            solver.restore(&saved)?;
            info!(state = %resume.display(), restored = saved.determined_count(), "resumed");
        }

        let total = solver.cells().len();
        let progress = if self.cli.should_show_progress() {
            ProgressManager::new(total, &input_path.file_name().unwrap_or_default().to_string_lossy())
        } else {
            ProgressManager::hidden(total)
        };
        let report = solver.solve_observed(|step| progress.update(&step))?;
        progress.finish(&report);

        if report.state != SolveState::Solved {
            warn!(
                input = %input_path.display(),
                collapsed = solver.collapsed_count(),
                cells = total,
                "grid left partially collapsed"
            );
        }

        let image_path = output_path(input_path, "png");
        export_grid_as_png(&solver.grid(), &image_path)?;

        if !self.cli.no_state {
            solver.save().save(&output_path(input_path, STATE_EXTENSION))?;
        }

        info!(
            output = %image_path.display(),
            state = %report.state,
            attempts = report.attempts,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "finished"
        );
        Ok(())
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
}

fn not_a_png(path: &Path) -> WfcError {
    WfcError::FileSystem {
        path: path.to_path_buf(),
        operation: "open input",
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "target must be a PNG file or directory",
        ),
    }
}

/// Path of a generated file next to the input, `<stem>_wfc.<extension>`
pub fn output_path(input_path: &Path, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{OUTPUT_SUFFIX}.{extension}", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
