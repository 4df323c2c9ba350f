use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::deletion::{Classification, ItemOutcome};
use crate::utils::{one_line_preview, sanitize};

const PREVIEW_CHARS: usize = 48;

/// Terminal progress display for a purge run
///
/// The bar advances by whole batches (from job progress); the message shows
/// the most recently deleted message, and failures are printed above the bar.
pub struct PurgeProgress {
    bar: ProgressBar,
}

impl PurgeProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} Deleting [{bar:30.cyan/dim}] {pos}/{len} ({eta} remaining) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn set_completed(&self, completed: usize) {
        self.bar.set_position(completed as u64);
    }

    pub fn on_outcome(&self, outcome: &ItemOutcome) {
        match outcome.classification() {
            Classification::Deleted => {
                let contents = outcome.item.contents();
                let label = if contents.is_empty() { outcome.item.message_id() } else { contents };
                self.bar.set_message(one_line_preview(label, PREVIEW_CHARS));
            }
            Classification::Failed => {
                self.bar.println(format!(
                    "  \x1b[31m✗\x1b[0m {}/{}: {}",
                    sanitize(&outcome.item.conversation_id),
                    sanitize(outcome.item.message_id()),
                    outcome.outcome
                ));
            }
        }
    }

    pub fn note(&self, text: &str) {
        self.bar.println(format!("  {}", text));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
