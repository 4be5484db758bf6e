//! Tests for argument parsing and the file processing pipeline

#[cfg(test)]
mod tests {
    use clap::Parser;
    use image::{Rgba, RgbaImage};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use tilecollapse::io::cli::{Cli, FileProcessor, output_path, parse_size};
    use tilecollapse::io::configuration::{Propagation, RetryPolicy};
    use tilecollapse::io::saved_state::SavedState;
    use tilecollapse::spatial::grid::GridSize;
    use tracing::Level;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tilecollapse").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    /// Two-by-two checkerboard of solid 4-pixel tiles
    fn write_checkerboard(dir: &Path) -> PathBuf {
        let path = dir.join("checker.png");
        let image = RgbaImage::from_fn(8, 8, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([200, 40, 40, 255])
            } else {
                Rgba([40, 40, 200, 255])
            }
        });
        image.save(&path).expect("write sheet");
        path
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4x3"), Ok(GridSize::new(4, 3)));
        assert_eq!(parse_size("2X5"), Ok(GridSize::new(2, 5)));
        assert!(parse_size("4").is_err());
        assert!(parse_size("ax3").is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["sheet.png"]);
        assert_eq!(cli.target, PathBuf::from("sheet.png"));
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());
        assert_eq!(cli.log_level(), Level::INFO);

        let config = cli.config().expect("defaults are valid");
        assert_eq!(config.output_size, GridSize::new(16, 16));
        assert_eq!(config.pattern_size, GridSize::new(1, 1));
        assert_eq!(config.retry_policy, RetryPolicy::InPlace);
        assert_eq!(config.propagation, Propagation::Local);
        assert!(config.wrap_output);
    }

    // Flags map onto the solver's policies
    #[test]
    fn test_flags_map_to_config() {
        let cli = parse(&[
            "sheet.png",
            "-p",
            "2x2",
            "-o",
            "8x4",
            "--reset-on-contradiction",
            "--cascade",
            "--bounded",
            "-s",
            "7",
            "-i",
            "3",
        ]);
        let config = cli.config().expect("valid flags");
        assert_eq!(config.pattern_size, GridSize::new(2, 2));
        assert_eq!(config.cell_grid_size(), GridSize::new(4, 2));
        assert_eq!(config.retry_policy, RetryPolicy::Reset);
        assert_eq!(config.propagation, Propagation::Cascading);
        assert!(!config.wrap_output);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_iterations, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(parse(&["sheet.png", "-p", "2x2", "-o", "3x3"]).config().is_err());
        assert!(parse(&["sheet.png", "-e", "1"]).config().is_err());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse(&["a.png", "-q"]).log_level(), Level::WARN);
        assert_eq!(parse(&["a.png", "-v"]).log_level(), Level::DEBUG);
        assert!(!parse(&["a.png", "-q"]).should_show_progress());
        assert!(Cli::try_parse_from(["tilecollapse", "a.png", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("maps/forest.png"), "png"),
            PathBuf::from("maps/forest_wfc.png")
        );
        assert_eq!(
            output_path(Path::new("forest.png"), "json"),
            PathBuf::from("forest_wfc.json")
        );
    }

    // A run writes the image and the saved state next to the input
    // Verified by writing the state only when --no-state is given
    #[test]
    fn test_process_writes_outputs() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_checkerboard(dir.path());
        let target = input.to_string_lossy().into_owned();

        FileProcessor::new(parse(&[target.as_str(), "-t", "4", "-o", "4x4", "-q"]))
            .process()
            .expect("checkerboard solves");

        let image = image::open(dir.path().join("checker_wfc.png"))
            .expect("output image")
            .to_rgba8();
        assert_eq!(image.dimensions(), (16, 16));

        let saved = SavedState::load(&dir.path().join("checker_wfc.json")).expect("saved state");
        assert_eq!(saved.len(), 16);
        assert_eq!(saved.determined_count(), 16);
    }

    // Generated files are never used as inputs, existing outputs are skipped
    #[test]
    fn test_directory_processing() {
        let dir = TempDir::new().expect("temp dir");
        write_checkerboard(dir.path());
        let target = dir.path().to_string_lossy().into_owned();

        let args = [target.as_str(), "-t", "4", "-o", "2x2", "-q", "--no-state"];
        FileProcessor::new(parse(&args))
            .process()
            .expect("first run");
        let output = dir.path().join("checker_wfc.png");
        assert!(output.exists());
        assert!(!dir.path().join("checker_wfc.json").exists());

        // The second run skips checker.png and ignores checker_wfc.png
        FileProcessor::new(parse(&[target.as_str(), "-t", "4", "-o", "2x2", "-q"]))
            .process()
            .expect("second run");
        assert!(!dir.path().join("checker_wfc.json").exists());
        assert!(!dir.path().join("checker_wfc_wfc.png").exists());
    }

    // Resuming replays the saved grid before solving
    #[test]
    fn test_resume_from_state() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_checkerboard(dir.path());
        let target = input.to_string_lossy().into_owned();
        let state = dir.path().join("start.json");
        SavedState::new(vec![1, -1, -1, -1]).save(&state).expect("write state");
        let state_arg = state.to_string_lossy().into_owned();

        let args = [
            target.as_str(),
            "-t",
            "4",
            "-o",
            "2x2",
            "-q",
            "-r",
            state_arg.as_str(),
        ];
        FileProcessor::new(parse(&args))
            .process()
            .expect("resumed run");

        let saved = SavedState::load(&dir.path().join("checker_wfc.json")).expect("saved state");
        assert_eq!(saved.entries(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_missing_target() {
        let processor = FileProcessor::new(parse(&["does/not/exist.png", "-q"]));
        assert!(processor.process().is_err());
    }
}
