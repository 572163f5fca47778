//! Conversion Pipeline

pub mod progress;
pub mod instrument;
pub mod batch;

pub use progress::{ProgressReporter, BarProgress, NoProgress};
pub use instrument::{InstrumentConverter, ConversionReport, SampleFailure, Outcome};
pub use batch::{BatchRunner, BatchReport, ARCHIVE_EXTENSION};
