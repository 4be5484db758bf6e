//! Tests for tile sheet slicing and grid rendering

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;
    use tilecollapse::WfcError;
    use tilecollapse::algorithm::solver::CoreSolver;
    use tilecollapse::analysis::input::{InputReader, TileBounds, TilemapSource};
    use tilecollapse::analysis::patterns::PatternCatalog;
    use tilecollapse::io::configuration::SolverConfig;
    use tilecollapse::io::image::{ImageTilemap, export_grid_as_png, render_grid};
    use tilecollapse::spatial::grid::GridSize;
    use tilecollapse::spatial::tiles::{PixelRect, RenderableAsset};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    /// Sheet of 2x2-pixel tiles, one colour per tile
    fn sheet(rows: &[&[[u8; 4]]]) -> RgbaImage {
        let columns = rows.first().map_or(0, |row| row.len()) as u32;
        RgbaImage::from_fn(columns * 2, rows.len() as u32 * 2, |x, y| {
            let color = rows
                .get((y / 2) as usize)
                .and_then(|row| row.get((x / 2) as usize))
                .copied()
                .unwrap_or(CLEAR);
            Rgba(color)
        })
    }

    /// Solver over the 1x1 patterns of a single-row red and blue sheet
    fn red_blue_solver() -> CoreSolver {
        let tilemap = ImageTilemap::from_image(sheet(&[&[RED, BLUE]]), 2).expect("valid sheet");
        let tiles = InputReader::new(&tilemap, 2)
            .read_tilemap()
            .expect("dense sheet");
        let catalog = PatternCatalog::extract(&tiles, GridSize::new(1, 1), false, false)
            .expect("patterns");
        let config = SolverConfig {
            seed: Some(1),
            wrap_output: false,
            ..SolverConfig::default()
        };
        CoreSolver::new(catalog.into_patterns(), GridSize::new(2, 1), config).expect("session")
    }

    // Identical tiles share an asset, transparent tiles are empty cells
    // Verified by keying assets on sheet position instead of content
    #[test]
    fn test_slicing_and_dedup() {
        let tilemap = ImageTilemap::from_image(
            sheet(&[&[RED, BLUE, RED], &[CLEAR, RED, BLUE]]),
            2,
        )
        .expect("valid sheet");

        assert_eq!(tilemap.tile_pixels(), 2);
        assert_eq!(tilemap.asset_count(), 2);
        assert_eq!(tilemap.cell_bounds(), TileBounds::new(0, 0, 3, 2));

        let first = tilemap.asset_at(0, 0).expect("red tile");
        assert_eq!(first.id(), 0);
        assert_eq!(tilemap.asset_at(2, 0), Some(first.clone()));
        assert_eq!(tilemap.asset_at(1, 0).map(|asset| asset.id()), Some(1));
        assert_eq!(tilemap.asset_at(0, 1), None);
        assert_eq!(tilemap.asset_at(-1, 0), None);
        assert_eq!(tilemap.asset_at(3, 0), None);

        assert_eq!(first.texture_rect(), PixelRect::new(0, 0, 2, 2));
        assert!(first.pixel_block(PixelRect::new(5, 0, 2, 2)).is_err());
    }

    // A transparent hole makes the sheet malformed for reading
    #[test]
    fn test_transparent_hole_is_malformed() {
        let tilemap = ImageTilemap::from_image(sheet(&[&[RED, BLUE], &[CLEAR, RED]]), 2)
            .expect("valid sheet");
        assert!(matches!(
            InputReader::new(&tilemap, 2).read_tilemap(),
            Err(WfcError::MalformedInput { found: 3, .. })
        ));
    }

    #[test]
    fn test_tile_size_must_divide_sheet() {
        let image = sheet(&[&[RED, BLUE]]);
        assert!(matches!(
            ImageTilemap::from_image(image.clone(), 0),
            Err(WfcError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ImageTilemap::from_image(image, 3),
            Err(WfcError::InvalidParameter { .. })
        ));
    }

    // Cells are drawn left to right, undetermined cells stay transparent
    // Verified by swapping row and column when placing slots
    #[test]
    fn test_render_grid() {
        let mut solver = red_blue_solver();
        solver.collapse(1, Some(1)).expect("collapse to blue");

        let partial = render_grid(&solver.grid()).expect("one cell collapsed");
        assert_eq!(partial.dimensions(), (4, 2));
        assert_eq!(partial.get_pixel(0, 0).0, CLEAR);
        assert_eq!(partial.get_pixel(3, 1).0, BLUE);

        solver.collapse(0, Some(0)).expect("collapse to red");
        let full = render_grid(&solver.grid()).expect("solved grid");
        assert_eq!(full.get_pixel(1, 1).0, RED);
        assert_eq!(full.get_pixel(2, 0).0, BLUE);
    }

    #[test]
    fn test_render_requires_collapsed_cell() {
        let solver = red_blue_solver();
        assert!(matches!(
            render_grid(&solver.grid()),
            Err(WfcError::InvalidSourceData { .. })
        ));
    }

    #[test]
    fn test_export_creates_directories() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("grid.png");
        let mut solver = red_blue_solver();
        solver.collapse(0, Some(0)).expect("collapse");

        export_grid_as_png(&solver.grid(), &path).expect("export");
        let written = image::open(&path).expect("readable png").to_rgba8();
        assert_eq!(written.dimensions(), (4, 2));
        assert_eq!(written.get_pixel(0, 0).0, RED);

        let reloaded = ImageTilemap::from_png(&path, 2).expect("reload sheet");
        assert_eq!(reloaded.asset_count(), 1);
        assert!(matches!(
            ImageTilemap::from_png(&dir.path().join("missing.png"), 2),
            Err(WfcError::ImageLoad { .. })
        ));
    }
}
