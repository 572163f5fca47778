//! xrni-export - Renoise Instrument Sample Exporter
//!
//! Pulls the embedded samples out of XRNI instrument archives and writes
//! them as PCM WAV with a chosen channel layout and bit depth.

pub mod archive;
pub mod audio;
pub mod config;
pub mod convert;
pub mod error;
pub mod naming;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, Args, BitDepth, ChannelMode};
pub use convert::{BatchRunner, BatchReport, InstrumentConverter};
pub use error::{XrniError, ArchiveError, Result};

use indicatif::ProgressBar;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Install the global logger. `RUST_LOG` still overrides the level.
///
/// With a progress bar, each record is written while the bar is suspended
/// so log lines never land in the middle of a redraw.
pub fn init_logging(verbose: bool, bar: Option<ProgressBar>) {
    let logger = BarLogger::new(verbose, bar);
    let max_level = logger.inner.filter();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }
}

struct BarLogger {
    inner: env_logger::Logger,
    bar: Option<ProgressBar>,
}

impl BarLogger {
    fn new(verbose: bool, bar: Option<ProgressBar>) -> Self {
        let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
        let inner = env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .build();
        Self { inner, bar }
    }
}

impl log::Log for BarLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.inner.matches(record) {
            return;
        }
        match &self.bar {
            Some(bar) => bar.suspend(|| self.inner.log(record)),
            None => self.inner.log(record),
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
