//! Batch progress reporting

use std::path::Path;
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

/// Receives the batch size up front and one call per archive
pub trait ProgressReporter {
    fn start(&self, total: usize);
    fn advance(&self, index: usize, archive: &Path);
    fn finish(&self);
}

/// Terminal progress bar
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    /// Handle to the underlying bar, shared with the logger
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn advance(&self, index: usize, archive: &Path) {
        self.bar.set_position(index as u64);
        if let Some(name) = archive.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Reports nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _total: usize) {}
    fn advance(&self, _index: usize, _archive: &Path) {}
    fn finish(&self) {}
}
