//! CLI entry point for edge-fingerprint tilemap synthesis

use clap::Parser;
use tilecollapse::io::cli::{Cli, FileProcessor};
use tracing_subscriber::FmtSubscriber;

fn main() -> tilecollapse::Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_target(false)
        .compact()
        .init();

    FileProcessor::new(cli).process()
}
