//! Single instrument conversion
//!
//! Opens one archive, picks the sample entries, names them and writes one
//! WAV per sample to `<export_root>/<instrument>/<name>.wav`. Undecodable
//! samples are reported and skipped; name and filesystem failures are not.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use rayon::prelude::*;

use crate::archive::{ArchiveReader, sample_entries};
use crate::audio::{AudioCodec, AudioTranscoder, SymphoniaCodec};
use crate::config::{Config, DuplicatePolicy, NameErrorPolicy};
use crate::error::{XrniError, Result};
use crate::naming::NamePattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No entries under the sample namespace; nothing written
    Empty,
    Converted,
}

#[derive(Debug, Clone)]
pub struct SampleFailure {
    pub entry: String,
    pub error: XrniError,
}

#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub instrument: String,
    pub output_dir: PathBuf,
    pub outcome: Outcome,
    pub samples_found: usize,
    pub written: Vec<PathBuf>,
    pub failed: Vec<SampleFailure>,
    /// Stop was requested before every sample was processed
    pub interrupted: bool,
}

impl ConversionReport {
    fn new(instrument: String, output_dir: PathBuf) -> Self {
        Self {
            instrument,
            output_dir,
            outcome: Outcome::Empty,
            samples_found: 0,
            written: Vec::new(),
            failed: Vec::new(),
            interrupted: false,
        }
    }
}

/// A sample entry with its final output file name decided
#[derive(Debug, Clone)]
struct PlannedSample {
    entry: String,
    name: String,
    extension: String,
}

enum SampleOutcome {
    Written(PathBuf),
    Failed(SampleFailure),
    Cancelled,
}

/// Hands out output names within one instrument according to the duplicate policy.
///
/// Names are compared case-insensitively since `Hit.wav` and `hit.wav` are
/// the same file on macOS and Windows.
struct NamePlanner {
    policy: DuplicatePolicy,
    used: HashSet<String>,
}

impl NamePlanner {
    fn new(policy: DuplicatePolicy) -> Self {
        Self { policy, used: HashSet::new() }
    }

    fn claim(&mut self, name: String) -> Result<String> {
        if self.used.insert(name.to_lowercase()) {
            return Ok(name);
        }

        match self.policy {
            DuplicatePolicy::Overwrite => Ok(name),
            DuplicatePolicy::Skip => Err(XrniError::DuplicateName { name }),
            DuplicatePolicy::Suffix => {
                let mut n = 2;
                loop {
                    let candidate = format!("{} {}", name, n);
                    if self.used.insert(candidate.to_lowercase()) {
                        return Ok(candidate);
                    }
                    n += 1;
                }
            }
        }
    }
}

pub struct InstrumentConverter<C: AudioCodec = SymphoniaCodec> {
    transcoder: AudioTranscoder<C>,
    pattern: NamePattern,
    config: Config,
    stop: Arc<AtomicBool>,
}

impl InstrumentConverter {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_codec(config, NamePattern::canonical()?, SymphoniaCodec))
    }
}

impl<C: AudioCodec> InstrumentConverter<C> {
    pub fn with_codec(config: Config, pattern: NamePattern, codec: C) -> Self {
        Self {
            transcoder: AudioTranscoder::new(codec),
            pattern,
            config,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set to stop before the next sample starts; samples already written stay on disk
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Convert every sample of one archive
    pub fn convert(&self, archive_path: &Path) -> Result<ConversionReport> {
        let instrument = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_dir = self.config.export_root().join(&instrument);
        let mut report = ConversionReport::new(instrument, output_dir);

        log::info!("Reading XRNI {}...", archive_path.display());
        let mut reader = ArchiveReader::open(archive_path)?;

        let entries: Vec<String> = sample_entries(reader.entries())
            .into_iter()
            .map(str::to_string)
            .collect();

        if entries.is_empty() {
            log::warn!("No samples found for {}", report.instrument);
            return Ok(report);
        }

        report.outcome = Outcome::Converted;
        report.samples_found = entries.len();
        log::info!("Found {} samples", entries.len());

        let mut planner = NamePlanner::new(self.config.policy.duplicates);

        if self.config.jobs() <= 1 {
            for entry in &entries {
                if self.stopped() {
                    report.interrupted = true;
                    break;
                }
                let Some(plan) = self.plan(entry, &mut planner, &mut report)? else {
                    continue;
                };
                let bytes = reader.read_entry(&plan.entry)?;
                let outcome = self.process(&plan, bytes, &report.output_dir)?;
                record(&mut report, outcome);
            }
        } else {
            drop(reader);
            self.convert_parallel(archive_path, &entries, &mut planner, &mut report)?;
        }

        if report.interrupted {
            log::warn!("Stopped {} before all samples were converted", report.instrument);
        }

        log::info!(
            "{}: {} written, {} failed",
            report.instrument,
            report.written.len(),
            report.failed.len()
        );

        Ok(report)
    }

    /// Names are resolved in listing order first, so an unparsable name
    /// stops the archive before any transcoding starts.
    fn convert_parallel(
        &self,
        archive_path: &Path,
        entries: &[String],
        planner: &mut NamePlanner,
        report: &mut ConversionReport,
    ) -> Result<()> {
        let mut plans = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(plan) = self.plan(entry, planner, report)? {
                plans.push(plan);
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs())
            .build()
            .map_err(|e| XrniError::config(format!("Cannot build worker pool: {}", e)))?;

        let output_dir = report.output_dir.clone();
        let outcomes: Vec<Result<SampleOutcome>> = pool.install(|| {
            plans
                .par_iter()
                .map_init(
                    || ArchiveReader::open(archive_path),
                    |reader, plan| {
                        if self.stopped() {
                            return Ok(SampleOutcome::Cancelled);
                        }
                        let reader = reader.as_mut().map_err(|e| e.clone())?;
                        let bytes = reader.read_entry(&plan.entry)?;
                        self.process(plan, bytes, &output_dir)
                    },
                )
                .collect()
        });

        for outcome in outcomes {
            record(report, outcome?);
        }

        Ok(())
    }

    fn plan(
        &self,
        entry: &str,
        planner: &mut NamePlanner,
        report: &mut ConversionReport,
    ) -> Result<Option<PlannedSample>> {
        let (name, extension) = match self.pattern.parse_entry(entry) {
            Ok(parsed) => parsed,
            Err(e) => match self.config.policy.name_errors {
                NameErrorPolicy::Abort => {
                    log::error!("could not extract name from {}", entry);
                    return Err(e);
                }
                NameErrorPolicy::Skip => {
                    log::warn!("could not extract name from {}, skipping", entry);
                    report.failed.push(SampleFailure { entry: entry.to_string(), error: e });
                    return Ok(None);
                }
            },
        };

        match planner.claim(name) {
            Ok(name) => Ok(Some(PlannedSample { entry: entry.to_string(), name, extension })),
            Err(e) => {
                log::warn!("{} in {}, skipping {}", e, report.instrument, entry);
                report.failed.push(SampleFailure { entry: entry.to_string(), error: e });
                Ok(None)
            }
        }
    }

    fn process(&self, plan: &PlannedSample, bytes: Vec<u8>, output_dir: &Path) -> Result<SampleOutcome> {
        log::debug!("Converting {}...", plan.name);

        let transcoded = match self.transcoder.transcode(
            bytes,
            &plan.extension,
            self.config.channels(),
            self.config.bit_depth(),
        ) {
            Ok(t) => t,
            Err(e @ (XrniError::Decode { .. } | XrniError::Encode { .. })) => {
                log::warn!("error decoding {}: {}", plan.name, e);
                return Ok(SampleOutcome::Failed(SampleFailure { entry: plan.entry.clone(), error: e }));
            }
            Err(e) => return Err(e),
        };

        std::fs::create_dir_all(output_dir)
            .map_err(|e| XrniError::filesystem(output_dir, e))?;

        let path = output_dir.join(format!("{}.wav", plan.name));
        std::fs::write(&path, &transcoded.wav)
            .map_err(|e| XrniError::filesystem(&path, e))?;

        log::debug!(
            "Wrote {} ({} ch, {} Hz, {})",
            path.display(),
            transcoded.info.channels,
            transcoded.info.sample_rate,
            transcoded.info.bit_depth
        );

        Ok(SampleOutcome::Written(path))
    }
}

fn record(report: &mut ConversionReport, outcome: SampleOutcome) {
    match outcome {
        SampleOutcome::Written(path) => report.written.push(path),
        SampleOutcome::Failed(failure) => report.failed.push(failure),
        SampleOutcome::Cancelled => report.interrupted = true,
    }
}
