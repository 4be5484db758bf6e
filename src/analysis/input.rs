//! Reading a host tilemap region into a dense tile grid

use crate::io::error::{Result, WfcError};
use crate::spatial::tiles::{RenderableAsset, Tile, TileGrid};
use ndarray::Array2;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Rectangular region of host cell coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TileBounds {
    /// Leftmost column
    pub min_x: i32,
    /// Topmost row
    pub min_y: i32,
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl TileBounds {
    /// Create bounds from a minimum corner and a size
    pub const fn new(min_x: i32, min_y: i32, width: usize, height: usize) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Iterate every coordinate row by row, `y` outer
    pub fn coordinates(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let Self {
            min_x,
            min_y,
            width,
            height,
        } = *self;
        (0..height).flat_map(move |dy| {
            (0..width).map(move |dx| (min_x + dx as i32, min_y + dy as i32))
        })
    }
}

/// Host tilemap region the reader scans
///
/// Host maps may leave cells empty and may use negative coordinates.
pub trait TilemapSource {
    /// Asset handle stored in a host cell
    type Asset: RenderableAsset + Clone + Eq + Hash + 'static;

    /// Region to scan
    fn cell_bounds(&self) -> TileBounds;

    /// Asset at a host coordinate, `None` for empty cells
    fn asset_at(&self, x: i32, y: i32) -> Option<Self::Asset>;
}

/// In-memory tilemap backed by an array of optional assets
#[derive(Clone, Debug)]
pub struct MemoryTilemap<A> {
    cells: Array2<Option<A>>,
    origin: (i32, i32),
}

impl<A> MemoryTilemap<A> {
    /// Wrap a `(height, width)` array whose top-left sits at `(0, 0)`
    pub const fn new(cells: Array2<Option<A>>) -> Self {
        Self {
            cells,
            origin: (0, 0),
        }
    }

    /// Move the top-left corner to another host coordinate
    #[must_use]
    pub const fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Build from rows of optional assets, top row first
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if the rows differ in length
    pub fn from_rows(rows: Vec<Vec<Option<A>>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(WfcError::InvalidSourceData {
                reason: "tilemap rows have different lengths".to_string(),
            });
        }
        let cells = Array2::from_shape_vec((height, width), rows.into_iter().flatten().collect())
            .map_err(|e| WfcError::InvalidSourceData {
                reason: e.to_string(),
            })?;
        Ok(Self::new(cells))
    }
}

impl<A> TilemapSource for MemoryTilemap<A>
where
    A: RenderableAsset + Clone + Eq + Hash + 'static,
{
    type Asset = A;

    fn cell_bounds(&self) -> TileBounds {
        let (height, width) = self.cells.dim();
        TileBounds::new(self.origin.0, self.origin.1, width, height)
    }

    fn asset_at(&self, x: i32, y: i32) -> Option<A> {
        let col = usize::try_from(i64::from(x) - i64::from(self.origin.0)).ok()?;
        let row = usize::try_from(i64::from(y) - i64::from(self.origin.1)).ok()?;
        self.cells.get([row, col]).cloned().flatten()
    }
}

/// Converts a host region into a tile grid
pub struct InputReader<'a, S> {
    source: &'a S,
    samples: usize,
}

impl<'a, S: TilemapSource> InputReader<'a, S> {
    /// Reader sampling `samples` pixels per tile edge
    pub const fn new(source: &'a S, samples: usize) -> Self {
        Self { source, samples }
    }

    /// Scan the source and build a dense tile grid
    ///
    /// Occupied cells must fill their bounding box exactly. Assets get
    /// indices in the order they are first met, scanning rows top to bottom.
    /// The returned grid starts at the bounding box's minimum corner.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No occupied cell is found
    /// - The occupied cells leave holes in their bounding box
    /// - An asset's pixels cannot be read or fingerprinted
    pub fn read_tilemap(&self) -> Result<TileGrid> {
        let occupied: Vec<(i64, i64, S::Asset)> = self
            .source
            .cell_bounds()
            .coordinates()
            .filter_map(|(x, y)| {
                self.source
                    .asset_at(x, y)
                    .map(|asset| (i64::from(x), i64::from(y), asset))
            })
            .collect();

        let (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) = (
            occupied.iter().map(|(x, _, _)| *x).min(),
            occupied.iter().map(|(x, _, _)| *x).max(),
            occupied.iter().map(|(_, y, _)| *y).min(),
            occupied.iter().map(|(_, y, _)| *y).max(),
        ) else {
            return Err(WfcError::EmptyInput);
        };

        let width = (max_x - min_x + 1) as usize;
        let height = (max_y - min_y + 1) as usize;
        let malformed = WfcError::MalformedInput {
            width,
            height,
            found: occupied.len(),
        };
        if occupied.len() != width * height {
            return Err(malformed);
        }

        let mut known: HashMap<S::Asset, Tile> = HashMap::new();
        let mut slots: Vec<Option<Tile>> = vec![None; width * height];

        for (x, y, asset) in occupied {
            let tile = match known.get(&asset) {
                Some(tile) => tile.clone(),
                None => {
                    let shared: Arc<dyn RenderableAsset> = Arc::new(asset.clone());
                    let tile = Tile::new(shared, known.len(), self.samples)?;
                    known.insert(asset, tile.clone());
                    tile
                }
            };
            let index = (x - min_x) as usize + (y - min_y) as usize * width;
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(tile);
            }
        }

        let tiles: Vec<Tile> = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(malformed)?;
        let tiles = Array2::from_shape_vec((height, width), tiles).map_err(|e| {
            WfcError::InvalidSourceData {
                reason: e.to_string(),
            }
        })?;

        Ok(TileGrid::new(tiles, known.len()))
    }
}
