//! Tests for saved-state snapshots and their JSON files

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use tempfile::TempDir;
    use tilecollapse::WfcError;
    use tilecollapse::algorithm::cell::Cell;
    use tilecollapse::analysis::patterns::Pattern;
    use tilecollapse::io::configuration::UNSET_PATTERN_ID;
    use tilecollapse::io::saved_state::SavedState;
    use tilecollapse::spatial::grid::GridPosition;
    use tilecollapse::spatial::tiles::{PixelAsset, Tile};

    // Undetermined cells are saved as the unset marker
    #[test]
    fn test_from_cells() {
        let tile = Tile::new(Arc::new(PixelAsset::solid(0, 2, [5, 5, 5, 255])), 0, 2)
            .expect("solid tile");
        let pattern = Arc::new(Pattern::filler(tile, 2));
        let cells = vec![
            Cell::collapsed(GridPosition::new(0, 0), pattern, 3),
            Cell::new(GridPosition::new(1, 0), 3),
        ];

        let saved = SavedState::from_cells(&cells);
        assert_eq!(saved.entries(), &[2, UNSET_PATTERN_ID]);
        assert_eq!(saved.determined_count(), 1);
        assert_eq!(saved.len(), 2);
    }

    #[test]
    fn test_unset() {
        let saved = SavedState::unset(3);
        assert_eq!(saved.entries(), &[-1, -1, -1]);
        assert_eq!(saved.determined_count(), 0);
        assert!(SavedState::default().is_empty());
    }

    // The JSON layout is a single `cells` array
    #[test]
    fn test_json_layout() {
        let saved = SavedState::new(vec![0, -1, 4]);
        let json = saved.to_json().expect("encode");
        assert_eq!(json, r#"{"cells":[0,-1,4]}"#);
        assert_eq!(SavedState::from_json(&json).expect("decode"), saved);
        assert!(matches!(
            SavedState::from_json(r#"{"tiles":[]}"#),
            Err(WfcError::Serialization { path: None, .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("grid.json");
        let saved = SavedState::new(vec![3, 1, -1, 0]);

        saved.save(&path).expect("write state");
        assert_eq!(SavedState::load(&path).expect("read state"), saved);
    }

    // Load errors name the file
    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            SavedState::load(&missing),
            Err(WfcError::FileSystem { .. })
        ));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").expect("write garbage");
        match SavedState::load(&garbage) {
            Err(WfcError::Serialization { path, .. }) => assert_eq!(path, Some(garbage)),
            other => unreachable!("Expected Serialization, got {other:?}"),
        }
    }
}
