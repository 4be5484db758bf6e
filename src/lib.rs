//! Wave function collapse over tilemaps using edge fingerprints
//!
//! Tiles are read from a host tilemap and fingerprinted by sampling pixels
//! along each edge. Fixed-size tile blocks are extracted as patterns and
//! deduplicated by their combined border fingerprints. The solver then fills
//! an output grid with patterns whose touching edges agree, collapsing the
//! most constrained cell first.

#![forbid(unsafe_code)]

/// Candidate selection, propagation and the solver session
pub mod algorithm;
/// Tilemap reading, fingerprinting and pattern extraction
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Grid addressing and tile data structures
pub mod spatial;

pub use algorithm::solver::{CoreSolver, SolveProgress, SolveReport, SolveState};
pub use analysis::patterns::{Pattern, PatternCatalog};
pub use io::error::{Result, WfcError};
