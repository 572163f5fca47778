//! Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Failures opening or reading an instrument archive
#[derive(Debug, Clone, Error)]
pub enum ArchiveError {
    #[error("archive not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("archive {} is not a valid ZIP container: {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },
    #[error("archive entry missing: {entry}")]
    EntryMissing { entry: String },
}

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum XrniError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("could not extract name from {path}")]
    NameExtraction { path: String },
    #[error("Decode error ({format}): {message}")]
    Decode { format: String, message: String },
    #[error("Encode error: {message}")]
    Encode { message: String },
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("Filesystem error at {}: {message}", .path.display())]
    Filesystem { path: PathBuf, message: String },
    #[error("duplicate sample name: {name}")]
    DuplicateName { name: String },
}

impl XrniError {
    pub fn decode<F: Into<String>, S: Into<String>>(format: F, msg: S) -> Self {
        Self::Decode { format: format.into(), message: msg.into() }
    }
    pub fn encode<S: Into<String>>(msg: S) -> Self { Self::Encode { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn filesystem<P: Into<PathBuf>, S: ToString>(path: P, err: S) -> Self {
        Self::Filesystem { path: path.into(), message: err.to_string() }
    }
    pub fn name_extraction<S: Into<String>>(path: S) -> Self {
        Self::NameExtraction { path: path.into() }
    }

    /// Whether this error stops the whole batch rather than the current job.
    ///
    /// Name extraction failures only reach the batch runner when the abort
    /// policy is active; under the skip policy they are handled per sample.
    pub fn is_fatal_for_batch(&self) -> bool {
        matches!(self, Self::NameExtraction { .. })
    }
}

pub type Result<T> = std::result::Result<T, XrniError>;
