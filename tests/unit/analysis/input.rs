//! Tests for tilemap scanning, rectangle validation and asset indexing

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use tilecollapse::WfcError;
    use tilecollapse::analysis::input::{InputReader, MemoryTilemap, TileBounds, TilemapSource};
    use tilecollapse::spatial::grid::{GridPosition, GridSize};
    use tilecollapse::spatial::tiles::{PixelAsset, Tile};

    fn solid(id: usize) -> PixelAsset {
        PixelAsset::solid(id, 3, [10 * id as u8, 0, 100, 255])
    }

    fn map(rows: &[&[Option<usize>]]) -> MemoryTilemap<PixelAsset> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|id| id.map(solid)).collect())
            .collect();
        MemoryTilemap::from_rows(rows).expect("rows have equal lengths")
    }

    // Assets are indexed in first-encounter order, scanning rows top to bottom
    // Verified by scanning columns before rows
    #[test]
    fn test_first_encounter_indices() {
        let source = map(&[&[Some(7), Some(3)], &[Some(3), Some(9)]]);
        let grid = InputReader::new(&source, 3).read_tilemap().expect("full rectangle");

        assert_eq!(grid.size(), GridSize::new(2, 2));
        assert_eq!(grid.asset_count(), 3);
        let index_at = |x, y| grid.get(GridPosition::new(x, y)).map(Tile::index);
        assert_eq!(index_at(0, 0), Some(0));
        assert_eq!(index_at(1, 0), Some(1));
        assert_eq!(index_at(0, 1), Some(1));
        assert_eq!(index_at(1, 1), Some(2));
    }

    // Tiles of the same asset share the asset object and the signature
    #[test]
    fn test_shared_signature_per_asset() {
        let source = map(&[&[Some(1), Some(1)]]);
        let grid = InputReader::new(&source, 3).read_tilemap().expect("full rectangle");
        let left = grid.get(GridPosition::new(0, 0)).expect("left tile");
        let right = grid.get(GridPosition::new(1, 0)).expect("right tile");

        assert!(left.shares_asset(right));
        assert_eq!(left.signature(), right.signature());
    }

    // Empty margins around the occupied rectangle are trimmed
    // Verified by using the scan bounds instead of the occupied bounding box
    #[test]
    fn test_bounding_box_local_coordinates() {
        let source = map(&[
            &[None, None, None],
            &[None, Some(1), Some(2)],
            &[None, Some(2), Some(1)],
        ]);
        let grid = InputReader::new(&source, 3).read_tilemap().expect("trimmed rectangle");

        assert_eq!(grid.size(), GridSize::new(2, 2));
        assert_eq!(grid.get(GridPosition::new(0, 0)).map(Tile::index), Some(0));
        assert_eq!(grid.get(GridPosition::new(1, 1)).map(Tile::index), Some(0));
    }

    #[test]
    fn test_negative_origin() {
        let source = map(&[&[Some(1), Some(2)]]).with_origin(-5, -2);
        assert_eq!(source.cell_bounds(), TileBounds::new(-5, -2, 2, 1));
        assert_eq!(source.asset_at(-4, -2).map(|asset| asset.id()), Some(2));
        assert!(source.asset_at(0, 0).is_none());

        let grid = InputReader::new(&source, 3).read_tilemap().expect("full rectangle");
        assert_eq!(grid.size(), GridSize::new(2, 1));
    }

    #[test]
    fn test_empty_input() {
        let source = map(&[&[None, None], &[None, None]]);
        assert!(matches!(
            InputReader::new(&source, 3).read_tilemap(),
            Err(WfcError::EmptyInput)
        ));

        let nothing = MemoryTilemap::<PixelAsset>::new(Array2::from_elem((0, 0), None));
        assert!(matches!(
            InputReader::new(&nothing, 3).read_tilemap(),
            Err(WfcError::EmptyInput)
        ));
    }

    // A hole inside the bounding box is rejected
    // Verified by removing the count check
    #[test]
    fn test_hole_is_malformed() {
        let source = map(&[&[Some(1), Some(1)], &[None, Some(1)]]);
        match InputReader::new(&source, 3).read_tilemap() {
            Err(WfcError::MalformedInput {
                width,
                height,
                found,
            }) => {
                assert_eq!((width, height, found), (2, 2, 3));
            }
            other => unreachable!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_outlier_is_malformed() {
        let source = map(&[&[Some(1), None, None], &[None, None, Some(1)]]);
        assert!(matches!(
            InputReader::new(&source, 3).read_tilemap(),
            Err(WfcError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![Some(solid(1)), Some(solid(2))], vec![Some(solid(1))]];
        assert!(matches!(
            MemoryTilemap::from_rows(rows),
            Err(WfcError::InvalidSourceData { .. })
        ));
    }

    #[test]
    fn test_bounds_coordinates_order() {
        let coordinates: Vec<(i32, i32)> = TileBounds::new(1, -1, 2, 2).coordinates().collect();
        assert_eq!(coordinates, vec![(1, -1), (2, -1), (1, 0), (2, 0)]);
    }
}
