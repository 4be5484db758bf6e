//! Spatial data structures and grid addressing
//!
//! This module contains spatial-related functionality including:
//! - Linear and 2D addressing with toroidal wrapping
//! - Pixel blocks and the renderable asset capability
//! - Tiles and dense tile grids

/// Grid sizes, positions, directions and index conversion
pub mod grid;
/// Tile data structures and pixel access
pub mod tiles;

pub use grid::{Direction, GridPosition, GridSize};
