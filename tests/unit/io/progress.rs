//! Tests for the solve progress bar

#[cfg(test)]
mod tests {
    use tilecollapse::io::progress::ProgressManager;
    use tilecollapse::spatial::grid::GridPosition;
    use tilecollapse::{SolveProgress, SolveReport, SolveState};

    // The bar tracks the collapsed count, not the number of updates
    #[test]
    fn test_hidden_bar_tracks_collapsed_cells() {
        let progress = ProgressManager::hidden(9);
        assert_eq!(progress.position(), 0);

        progress.update(&SolveProgress {
            attempt: 2,
            position: GridPosition::new(1, 1),
            collapsed: 4,
            total: 9,
        });
        assert_eq!(progress.position(), 4);

        progress.finish(&SolveReport {
            state: SolveState::Solved,
            attempts: 2,
            contradictions: 1,
        });
        assert_eq!(progress.position(), 4);
    }

    #[test]
    fn test_labelled_bar() {
        let progress = ProgressManager::new(4, "sheet.png");
        progress.update(&SolveProgress {
            attempt: 1,
            position: GridPosition::new(0, 0),
            collapsed: 1,
            total: 4,
        });
        assert_eq!(progress.position(), 1);
        progress.finish(&SolveReport {
            state: SolveState::Exhausted,
            attempts: 3,
            contradictions: 3,
        });
    }
}
