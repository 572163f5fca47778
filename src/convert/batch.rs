//! Batch conversion over a file or directory tree

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::WalkDir;

use crate::audio::AudioCodec;
use crate::audio::SymphoniaCodec;
use crate::config::Config;
use crate::convert::instrument::{InstrumentConverter, Outcome};
use crate::convert::progress::ProgressReporter;
use crate::error::{XrniError, Result};

/// Instrument archive file extension
pub const ARCHIVE_EXTENSION: &str = "xrni";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files: usize,
    pub converted: usize,
    pub empty: usize,
    pub failed: usize,
    pub samples_written: usize,
    pub samples_failed: usize,
    pub interrupted: bool,
}

pub struct BatchRunner<C: AudioCodec = SymphoniaCodec> {
    converter: InstrumentConverter<C>,
    stop: Arc<AtomicBool>,
}

impl BatchRunner {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_converter(InstrumentConverter::new(config)?))
    }
}

impl<C: AudioCodec> BatchRunner<C> {
    pub fn with_converter(converter: InstrumentConverter<C>) -> Self {
        let stop = converter.stop_flag();
        Self { converter, stop }
    }

    /// Set to stop the batch before the next sample or archive starts
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// All `.xrni` files under `root`, at any depth, ordered by path
    pub fn discover(root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Convert a single archive or every archive below a directory.
    ///
    /// A single archive that cannot be converted fails the run. In directory
    /// mode only batch-fatal errors stop the loop; other job failures are
    /// logged and counted.
    pub fn run(&self, root: &Path, progress: &dyn ProgressReporter) -> Result<BatchReport> {
        let export_root = self.converter.config().export_root();
        std::fs::create_dir_all(export_root)
            .map_err(|e| XrniError::filesystem(export_root, e))?;

        let mut report = BatchReport::default();

        if !root.is_dir() {
            report.files = 1;
            progress.start(1);
            progress.advance(0, root);
            let result = self.converter.convert(root);
            progress.finish();

            let job = result?;
            tally(&mut report, job.outcome, job.written.len(), job.failed.len());
            report.interrupted = job.interrupted;
            return Ok(report);
        }

        let files = Self::discover(root);
        report.files = files.len();
        log::info!("Found {} instruments under {}", files.len(), root.display());
        progress.start(files.len());

        for (index, file) in files.iter().enumerate() {
            if self.stop.load(Ordering::SeqCst) {
                log::warn!("Interrupted, {} instruments not processed", files.len() - index);
                report.interrupted = true;
                break;
            }

            progress.advance(index, file);

            match self.converter.convert(file) {
                Ok(job) => {
                    tally(&mut report, job.outcome, job.written.len(), job.failed.len());
                    if job.interrupted {
                        log::warn!("Interrupted, {} instruments not processed", files.len() - index - 1);
                        report.interrupted = true;
                        break;
                    }
                }
                Err(e) if e.is_fatal_for_batch() => {
                    progress.finish();
                    return Err(e);
                }
                Err(e) => {
                    log::error!("Failed to convert {}: {}", file.display(), e);
                    report.failed += 1;
                }
            }
        }

        progress.finish();
        Ok(report)
    }
}

fn tally(report: &mut BatchReport, outcome: Outcome, written: usize, failed: usize) {
    match outcome {
        Outcome::Empty => report.empty += 1,
        Outcome::Converted => report.converted += 1,
    }
    report.samples_written += written;
    report.samples_failed += failed;
}
