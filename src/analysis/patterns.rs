//! Pattern extraction and deduplication from an input tile grid

use crate::analysis::signature::EdgeSignature;
use crate::io::configuration::validate_pattern_size;
use crate::io::error::{Result, WfcError};
use crate::spatial::grid::{GridPosition, GridSize, wrap_position};
use crate::spatial::tiles::{Tile, TileGrid};
use ndarray::Array2;
use std::collections::HashSet;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Immutable block of tiles with a composite edge fingerprint
///
/// Patterns compare equal by their composite signature alone, so two blocks
/// with different interiors but identical borders are the same pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    id: usize,
    tiles: Array2<Tile>,
    signature: EdgeSignature,
}

impl Pattern {
    /// Build a pattern from a `(height, width)` tile block
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if the block is empty
    pub fn new(id: usize, tiles: Array2<Tile>) -> Result<Self> {
        let signature = composite_signature(&tiles)?;
        Ok(Self {
            id,
            tiles,
            signature,
        })
    }

    /// Single-tile pattern used to fill cells outside a shape
    pub fn filler(tile: Tile, id: usize) -> Self {
        let signature = *tile.signature();
        Self {
            id,
            tiles: Array2::from_elem((1, 1), tile),
            signature: composite_from_edges(
                &[signature.top],
                &[signature.right],
                &[signature.bottom],
                &[signature.left],
            ),
        }
    }

    /// Catalog id
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Block width in tiles
    pub fn width(&self) -> usize {
        self.tiles.ncols()
    }

    /// Block height in tiles
    pub fn height(&self) -> usize {
        self.tiles.nrows()
    }

    /// Block dimensions
    pub fn size(&self) -> GridSize {
        GridSize::new(self.width(), self.height())
    }

    /// Tile at `(x, y)` inside the block
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.get([y, x])
    }

    /// Underlying tile block
    pub const fn tiles(&self) -> &Array2<Tile> {
        &self.tiles
    }

    /// Composite edge fingerprint
    pub const fn signature(&self) -> &EdgeSignature {
        &self.signature
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}x{}", self.id, self.width(), self.height())
    }
}

/// Combine the fingerprints of a block's border tiles
///
/// Each side concatenates the decimal value of the matching component of
/// every tile on that side, left to right or top to bottom, then hashes it.
///
/// # Errors
///
/// Returns `InvalidSourceData` if the block has no tiles
pub fn composite_signature(tiles: &Array2<Tile>) -> Result<EdgeSignature> {
    let (height, width) = tiles.dim();
    if width == 0 || height == 0 {
        return Err(WfcError::InvalidSourceData {
            reason: "pattern block is empty".to_string(),
        });
    }

    let component = |x: usize, y: usize, pick: fn(&EdgeSignature) -> u64| {
        tiles.get([y, x]).map(|tile| pick(tile.signature()))
    };

    let top: Option<Vec<u64>> = (0..width).map(|x| component(x, 0, |s| s.top)).collect();
    let bottom: Option<Vec<u64>> = (0..width)
        .map(|x| component(x, height - 1, |s| s.bottom))
        .collect();
    let left: Option<Vec<u64>> = (0..height).map(|y| component(0, y, |s| s.left)).collect();
    let right: Option<Vec<u64>> = (0..height)
        .map(|y| component(width - 1, y, |s| s.right))
        .collect();

    match (top, right, bottom, left) {
        (Some(top), Some(right), Some(bottom), Some(left)) => {
            Ok(composite_from_edges(&top, &right, &bottom, &left))
        }
        _ => Err(WfcError::InvalidSourceData {
            reason: "pattern block has missing tiles".to_string(),
        }),
    }
}

fn composite_from_edges(top: &[u64], right: &[u64], bottom: &[u64], left: &[u64]) -> EdgeSignature {
    EdgeSignature::from_edge_strings(
        &concat_decimal(top),
        &concat_decimal(right),
        &concat_decimal(bottom),
        &concat_decimal(left),
    )
}

fn concat_decimal(values: &[u64]) -> String {
    values.iter().fold(String::new(), |mut text, value| {
        let _ = write!(text, "{value}");
        text
    })
}

/// Number of window origins along one axis
const fn positions_along(grid: usize, pattern: usize, step: usize, wrapping: bool) -> usize {
    if wrapping {
        grid.div_ceil(step)
    } else if grid >= pattern {
        (grid - pattern) / step + 1
    } else {
        0
    }
}

/// Unique patterns of one input grid, ids in first-encounter order
#[derive(Clone, Debug)]
pub struct PatternCatalog {
    patterns: Vec<Arc<Pattern>>,
    pattern_size: GridSize,
    pattern_grid_size: GridSize,
}

impl PatternCatalog {
    /// Slide a window over the tile grid and keep every distinct block
    ///
    /// The window advances one tile at a time when `overlapping`, a whole
    /// pattern otherwise. Blocks that run off the grid are dropped unless
    /// `wrapping`, in which case they wrap around to the opposite side.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A pattern dimension is zero
    /// - No window fits inside the grid
    pub fn extract(
        grid: &TileGrid,
        pattern_size: GridSize,
        overlapping: bool,
        wrapping: bool,
    ) -> Result<Self> {
        validate_pattern_size(pattern_size)?;

        let grid_size = grid.size();
        let (step_x, step_y) = if overlapping {
            (1, 1)
        } else {
            (pattern_size.width, pattern_size.height)
        };

        let pattern_grid_size = GridSize::new(
            positions_along(grid_size.width, pattern_size.width, step_x, wrapping),
            positions_along(grid_size.height, pattern_size.height, step_y, wrapping),
        );
        if pattern_grid_size.is_empty() {
            return Err(WfcError::EmptyInput);
        }

        let mut seen = HashSet::new();
        let mut patterns = Vec::new();

        for row in 0..pattern_grid_size.height {
            for col in 0..pattern_grid_size.width {
                let origin = GridPosition::new(col * step_x, row * step_y);
                let block = read_block(grid, origin, pattern_size)?;
                let pattern = Pattern::new(patterns.len(), block)?;
                if seen.insert(*pattern.signature()) {
                    patterns.push(Arc::new(pattern));
                }
            }
        }

        Ok(Self {
            patterns,
            pattern_size,
            pattern_grid_size,
        })
    }

    /// Unique patterns, `patterns()[i].id() == i`
    pub fn patterns(&self) -> &[Arc<Pattern>] {
        &self.patterns
    }

    /// Pattern by id
    pub fn get(&self, id: usize) -> Option<&Arc<Pattern>> {
        self.patterns.get(id)
    }

    /// Number of unique patterns
    pub const fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when nothing was extracted
    pub const fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Block size of every pattern
    pub const fn pattern_size(&self) -> GridSize {
        self.pattern_size
    }

    /// Extraction positions per axis
    pub const fn pattern_grid_size(&self) -> GridSize {
        self.pattern_grid_size
    }

    /// Hand the pattern list to a solver
    pub fn into_patterns(self) -> Vec<Arc<Pattern>> {
        self.patterns
    }
}

fn read_block(grid: &TileGrid, origin: GridPosition, size: GridSize) -> Result<Array2<Tile>> {
    let grid_size = grid.size();
    let mut tiles = Vec::with_capacity(size.area());

    for dy in 0..size.height {
        for dx in 0..size.width {
            let tile = wrap_position(
                (origin.x + dx) as i64,
                (origin.y + dy) as i64,
                grid_size,
            )
            .and_then(|position| grid.get(position))
            .ok_or(WfcError::EmptyInput)?;
            tiles.push(tile.clone());
        }
    }

    Array2::from_shape_vec(size.shape(), tiles).map_err(|e| WfcError::InvalidSourceData {
        reason: format!("pattern block at {origin}: {e}"),
    })
}
