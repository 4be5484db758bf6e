//! PNG tile sheets as tilemap sources, and PNG export of solved grids

use crate::algorithm::cell::Cell;
use crate::analysis::input::{TileBounds, TilemapSource};
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::spatial::tiles::{PixelBlock, PixelRect, RenderableAsset, asset_pixels};
use image::RgbaImage;
use ndarray::Array2;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

/// One distinct tile of a sheet
///
/// Identical tiles anywhere in the sheet share one asset, identified by the
/// order in which their content was first seen.
#[derive(Clone)]
pub struct SheetAsset {
    sheet: Arc<RgbaImage>,
    rect: PixelRect,
    id: usize,
}

impl SheetAsset {
    /// Content id within the sheet
    pub const fn id(&self) -> usize {
        self.id
    }
}

impl PartialEq for SheetAsset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.sheet, &other.sheet)
    }
}

impl Eq for SheetAsset {}

impl Hash for SheetAsset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for SheetAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetAsset")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

impl RenderableAsset for SheetAsset {
    fn texture_rect(&self) -> PixelRect {
        self.rect
    }

    fn pixel_block(&self, rect: PixelRect) -> Result<PixelBlock> {
        let sheet_rect = PixelRect::new(0, 0, self.sheet.width(), self.sheet.height());
        if !sheet_rect.contains_rect(&rect) {
            return Err(WfcError::InvalidSourceData {
                reason: format!("{rect:?} lies outside the {sheet_rect:?} sheet"),
            });
        }
        Ok(copy_rect(&self.sheet, rect))
    }
}

fn copy_rect(sheet: &RgbaImage, rect: PixelRect) -> PixelBlock {
    PixelBlock::from_fn(rect.width as usize, rect.height as usize, |x, y| {
        sheet
            .get_pixel_checked(rect.x + x as u32, rect.y + y as u32)
            .map_or([0; 4], |pixel| pixel.0)
    })
}

/// Tile sheet sliced into a grid of square tiles
///
/// Fully transparent tiles count as empty cells.
#[derive(Clone, Debug)]
pub struct ImageTilemap {
    cells: Array2<Option<SheetAsset>>,
    tile_pixels: u32,
    asset_count: usize,
}

impl ImageTilemap {
    /// Load a PNG tile sheet
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or its size is not a
    /// multiple of `tile_pixels`
    pub fn from_png(path: &Path, tile_pixels: u32) -> Result<Self> {
        let image = image::open(path).map_err(|e| WfcError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_image(image.to_rgba8(), tile_pixels)
    }

    /// Slice an in-memory sheet
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `tile_pixels` is zero or does not divide
    /// both image dimensions
    pub fn from_image(sheet: RgbaImage, tile_pixels: u32) -> Result<Self> {
        if tile_pixels == 0 {
            return Err(invalid_parameter(
                "tile_pixels",
                &tile_pixels,
                &"must be greater than zero",
            ));
        }
        let (width, height) = sheet.dimensions();
        if width % tile_pixels != 0 || height % tile_pixels != 0 {
            return Err(invalid_parameter(
                "tile_pixels",
                &tile_pixels,
                &format!("does not divide the {width}x{height} image"),
            ));
        }

        let sheet = Arc::new(sheet);
        let columns = (width / tile_pixels) as usize;
        let rows = (height / tile_pixels) as usize;
        let mut by_content: HashMap<Vec<u8>, SheetAsset> = HashMap::new();
        let mut assets = Vec::with_capacity(columns * rows);

        for row in 0..rows {
            for col in 0..columns {
                let rect = PixelRect::new(
                    col as u32 * tile_pixels,
                    row as u32 * tile_pixels,
                    tile_pixels,
                    tile_pixels,
                );
                let block = copy_rect(&sheet, rect);
                if block.is_transparent() {
                    assets.push(None);
                    continue;
                }

                let key: Vec<u8> = block.pixels().iter().flatten().copied().collect();
                let next_id = by_content.len();
                let asset = by_content
                    .entry(key)
                    .or_insert_with(|| SheetAsset {
                        sheet: Arc::clone(&sheet),
                        rect,
                        id: next_id,
                    })
                    .clone();
                assets.push(Some(asset));
            }
        }

        let cells = Array2::from_shape_vec((rows, columns), assets).map_err(|e| {
            WfcError::InvalidSourceData {
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            cells,
            tile_pixels,
            asset_count: by_content.len(),
        })
    }

    /// Edge length of one tile in pixels
    pub const fn tile_pixels(&self) -> u32 {
        self.tile_pixels
    }

    /// Number of distinct non-empty tiles
    pub const fn asset_count(&self) -> usize {
        self.asset_count
    }
}

impl TilemapSource for ImageTilemap {
    type Asset = SheetAsset;

    fn cell_bounds(&self) -> TileBounds {
        let (rows, columns) = self.cells.dim();
        TileBounds::new(0, 0, columns, rows)
    }

    fn asset_at(&self, x: i32, y: i32) -> Option<SheetAsset> {
        let col = usize::try_from(x).ok()?;
        let row = usize::try_from(y).ok()?;
        self.cells.get([row, col]).cloned().flatten()
    }
}

/// Draw a cell grid by blitting each collapsed pattern's tiles
///
/// Undetermined cells stay transparent. Every cell gets a slot the size of
/// the first collapsed pattern.
///
/// # Errors
///
/// Returns an error if no cell is collapsed or a tile's pixels cannot be read
pub fn render_grid(grid: &Array2<Cell>) -> Result<RgbaImage> {
    let first = grid
        .iter()
        .find_map(Cell::pattern)
        .ok_or_else(|| WfcError::InvalidSourceData {
            reason: "No cells have been collapsed".to_string(),
        })?;
    let unit = first
        .tile(0, 0)
        .map(|tile| tile.asset().texture_rect())
        .ok_or_else(|| WfcError::InvalidSourceData {
            reason: format!("pattern {first} has no tiles"),
        })?;
    let slot_width = first.width() as u32 * unit.width;
    let slot_height = first.height() as u32 * unit.height;

    let (rows, columns) = grid.dim();
    let mut image = RgbaImage::new(columns as u32 * slot_width, rows as u32 * slot_height);

    for ((row, col), cell) in grid.indexed_iter() {
        let Some(pattern) = cell.pattern() else {
            continue;
        };
        for ((dy, dx), tile) in pattern.tiles().indexed_iter() {
            let block = asset_pixels(tile.asset().as_ref())?;
            let origin_x = col as u32 * slot_width + dx as u32 * unit.width;
            let origin_y = row as u32 * slot_height + dy as u32 * unit.height;
            let width = (block.width() as u32).min(unit.width);
            let height = (block.height() as u32).min(unit.height);

            for py in 0..height {
                for px in 0..width {
                    let (Some(color), Some(pixel)) = (
                        block.get(px as usize, py as usize),
                        image.get_pixel_mut_checked(origin_x + px, origin_y + py),
                    ) else {
                        continue;
                    };
                    pixel.0 = color;
                }
            }
        }
    }

    Ok(image)
}

/// Render a cell grid and write it as PNG
///
/// # Errors
///
/// Returns an error if:
/// - No cell has been collapsed
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &Array2<Cell>, output_path: &Path) -> Result<()> {
    let image = render_grid(grid)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WfcError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image
        .save(output_path)
        .map_err(|e| WfcError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
