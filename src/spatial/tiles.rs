//! Tile data structures and the asset capability they are built from
//!
//! A tile wraps an opaque visual asset. The solver never looks at the asset
//! itself, only at the edge fingerprint computed from the asset's pixels, so
//! any host type that can hand out a pixel block can be used.

use crate::analysis::signature::EdgeSignature;
use crate::io::error::{Result, WfcError};
use crate::spatial::grid::{GridPosition, GridSize};
use ndarray::Array2;
use std::fmt;
use std::sync::Arc;

/// RGBA pixel
pub type Rgba = [u8; 4];

/// Rectangle inside a texture, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Create a rectangle
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `other` lies entirely inside this rectangle
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x as u64 + other.width as u64 <= self.x as u64 + self.width as u64
            && other.y as u64 + other.height as u64 <= self.y as u64 + self.height as u64
    }
}

/// Owned block of pixels, row 0 at the top
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelBlock {
    pixels: Array2<Rgba>,
}

impl PixelBlock {
    /// Wrap a `(height, width)` pixel array
    pub const fn new(pixels: Array2<Rgba>) -> Self {
        Self { pixels }
    }

    /// Block filled with one colour
    pub fn solid(width: usize, height: usize, color: Rgba) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), color),
        }
    }

    /// Build a block from a per-pixel function of `(x, y)`
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgba) -> Self {
        Self {
            pixels: Array2::from_shape_fn((height, width), |(y, x)| f(x, y)),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Pixel at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        self.pixels.get([y, x]).copied()
    }

    /// True when every pixel is fully transparent
    pub fn is_transparent(&self) -> bool {
        self.pixels.iter().all(|pixel| pixel[3] == 0)
    }

    /// Underlying pixel array
    pub const fn pixels(&self) -> &Array2<Rgba> {
        &self.pixels
    }
}

/// Capability a host asset must offer to become a tile
///
/// Implemented once per host asset kind; tile construction only needs to read
/// the asset's own pixels back.
pub trait RenderableAsset: fmt::Debug + Send + Sync {
    /// Region of the backing texture this asset occupies
    fn texture_rect(&self) -> PixelRect;

    /// Copy the pixels of `rect` out of the backing texture
    ///
    /// # Errors
    ///
    /// Returns an error if `rect` lies outside the texture
    fn pixel_block(&self, rect: PixelRect) -> Result<PixelBlock>;
}

/// Read an asset's own pixels, checking the rectangle it reports
///
/// # Errors
///
/// Returns `InvalidSourceData` if the asset reports an empty texture region,
/// or propagates the asset's own read error
pub fn asset_pixels(asset: &dyn RenderableAsset) -> Result<PixelBlock> {
    let rect = asset.texture_rect();
    if rect.width == 0 || rect.height == 0 {
        return Err(WfcError::InvalidSourceData {
            reason: format!("asset {asset:?} has an empty texture region"),
        });
    }
    asset.pixel_block(rect)
}

/// Asset that owns its pixels outright
///
/// Useful for procedurally drawn tiles and for hosts that keep no shared
/// texture. Equality covers both the id and the pixels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelAsset {
    id: usize,
    block: Arc<PixelBlock>,
}

impl PixelAsset {
    /// Wrap a pixel block
    pub fn new(id: usize, block: PixelBlock) -> Self {
        Self {
            id,
            block: Arc::new(block),
        }
    }

    /// Square asset of one colour
    pub fn solid(id: usize, size: usize, color: Rgba) -> Self {
        Self::new(id, PixelBlock::solid(size, size, color))
    }

    /// Host id
    pub const fn id(&self) -> usize {
        self.id
    }
}

impl RenderableAsset for PixelAsset {
    fn texture_rect(&self) -> PixelRect {
        PixelRect::new(0, 0, self.block.width() as u32, self.block.height() as u32)
    }

    fn pixel_block(&self, rect: PixelRect) -> Result<PixelBlock> {
        if !self.texture_rect().contains_rect(&rect) {
            return Err(WfcError::InvalidSourceData {
                reason: format!("{rect:?} lies outside asset {}", self.id),
            });
        }
        let (left, top) = (rect.x as usize, rect.y as usize);
        Ok(PixelBlock::from_fn(
            rect.width as usize,
            rect.height as usize,
            |x, y| self.block.get(left + x, top + y).unwrap_or_default(),
        ))
    }
}

/// Input tile: an asset, its per-read index and its edge fingerprint
#[derive(Clone)]
pub struct Tile {
    asset: Arc<dyn RenderableAsset>,
    index: usize,
    signature: EdgeSignature,
}

impl Tile {
    /// Fingerprint an asset and wrap it as a tile
    ///
    /// # Errors
    ///
    /// Returns an error if the asset pixels cannot be read or `samples` is
    /// below two
    pub fn new(asset: Arc<dyn RenderableAsset>, index: usize, samples: usize) -> Result<Self> {
        let pixels = asset_pixels(asset.as_ref())?;
        let signature = EdgeSignature::from_pixels(&pixels, samples)?;
        Ok(Self::with_signature(asset, index, signature))
    }

    /// Wrap an asset whose fingerprint is already known
    pub const fn with_signature(
        asset: Arc<dyn RenderableAsset>,
        index: usize,
        signature: EdgeSignature,
    ) -> Self {
        Self {
            asset,
            index,
            signature,
        }
    }

    /// Shared handle to the wrapped asset
    pub const fn asset(&self) -> &Arc<dyn RenderableAsset> {
        &self.asset
    }

    /// Index of the asset within its input read
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Edge fingerprint
    pub const fn signature(&self) -> &EdgeSignature {
        &self.signature
    }

    /// Whether two tiles wrap the very same asset object
    pub fn shares_asset(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.asset, &other.asset)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("index", &self.index)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// Dense rectangular grid of input tiles
#[derive(Clone, Debug)]
pub struct TileGrid {
    tiles: Array2<Tile>,
    asset_count: usize,
}

impl TileGrid {
    /// Wrap a `(height, width)` tile array
    ///
    /// `asset_count` is the number of distinct assets the tiles reference.
    pub const fn new(tiles: Array2<Tile>, asset_count: usize) -> Self {
        Self { tiles, asset_count }
    }

    /// Grid dimensions in tiles
    pub fn size(&self) -> GridSize {
        GridSize::new(self.tiles.ncols(), self.tiles.nrows())
    }

    /// Tile at a position
    pub fn get(&self, position: GridPosition) -> Option<&Tile> {
        self.tiles.get(position.as_array_index())
    }

    /// Number of distinct assets
    pub const fn asset_count(&self) -> usize {
        self.asset_count
    }

    /// Underlying tile array
    pub const fn tiles(&self) -> &Array2<Tile> {
        &self.tiles
    }
}
