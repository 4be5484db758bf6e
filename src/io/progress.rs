//! Progress bar over collapsed cells during a solve

use crate::algorithm::solver::{SolveProgress, SolveReport};
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Displays how many cells are collapsed and which attempt is running
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Visible bar over `total` cells
    pub fn new(total: usize, label: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_message(label.to_string());
        Self { bar }
    }

    /// Bar that draws nothing
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    /// Report a collapse
    pub fn update(&self, progress: &SolveProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.collapsed as u64);
        self.bar.set_prefix(format!("attempt {}", progress.attempt));
    }

    /// Cells collapsed so far as shown on the bar
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar with the solve outcome
    pub fn finish(&self, report: &SolveReport) {
        self.bar.finish_with_message(format!(
            "{} after {} attempts ({} contradictions)",
            report.state, report.attempts, report.contradictions
        ));
    }
}
