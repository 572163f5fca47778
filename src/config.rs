//! Configuration management for instrument export

use crate::error::{XrniError, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output PCM sample width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    Eight,
    Sixteen,
    TwentyFour,
}

impl BitDepth {
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::TwentyFour => 24,
        }
    }

    /// Bytes per sample, bits / 8
    pub fn bytes(self) -> u16 {
        self.bits() / 8
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = XrniError;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            other => Err(XrniError::config(format!(
                "Bit depth must be 8, 16 or 24, got {}", other
            ))),
        }
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    /// Downmix to a single channel
    Mono,
    /// Keep the source channel count
    Preserve,
}

/// What to do with an entry whose file name carries no `Sample<N>` token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameErrorPolicy {
    /// Stop the whole run
    Abort,
    /// Log the entry and carry on with the next sample
    Skip,
}

/// What to do when two samples in one instrument resolve to the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append " 2", " 3", ... to later occurrences
    Suffix,
    /// Later samples replace earlier ones
    Overwrite,
    /// Keep the first, report later ones as failed
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub policy: PolicyConfig,
    pub processing: ProcessingConfig,
    #[serde(skip)]
    pub input_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub export_root: PathBuf,
    pub channels: ChannelMode,
    pub bit_depth: BitDepth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub name_errors: NameErrorPolicy,
    pub duplicates: DuplicatePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub jobs: usize,
    pub verbose: bool,
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            policy: PolicyConfig::default(),
            processing: ProcessingConfig::default(),
            input_path: PathBuf::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_root: PathBuf::from("export"),
            channels: ChannelMode::Preserve,
            bit_depth: BitDepth::Sixteen,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            name_errors: NameErrorPolicy::Abort,
            duplicates: DuplicatePolicy::Suffix,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            verbose: false,
            progress: true,
        }
    }
}

impl Config {
    pub fn export_root(&self) -> &Path {
        &self.output.export_root
    }

    pub fn channels(&self) -> ChannelMode {
        self.output.channels
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.output.bit_depth
    }

    pub fn jobs(&self) -> usize {
        self.processing.jobs
    }

    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }
}

fn parse_bit_depth(s: &str) -> std::result::Result<BitDepth, String> {
    let bits: u16 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    BitDepth::try_from(bits).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Parser)]
#[command(name = "xrni2wav", about = "Export Renoise instrument samples as WAV", version, author)]
pub struct Args {
    #[arg(help = "An .xrni file, or a directory searched recursively for .xrni files")]
    pub file_or_path: PathBuf,

    #[arg(long = "out", help = "Output folder [default: export]")]
    pub out: Option<PathBuf>,

    #[arg(long = "mono", help = "Downmix every sample to mono")]
    pub mono: bool,

    #[arg(long = "bit-depth", value_parser = parse_bit_depth, help = "Output bit depth: 8, 16 or 24 [default: 16]")]
    pub bit_depth: Option<BitDepth>,

    #[arg(short = 'j', long = "jobs", help = "Worker threads per instrument [default: 1]")]
    pub jobs: Option<usize>,

    #[arg(long = "on-duplicate", value_enum, help = "Handling of repeated sample names [default: suffix]")]
    pub on_duplicate: Option<DuplicatePolicy>,

    #[arg(long = "skip-bad-names", help = "Skip samples with unparsable names instead of stopping")]
    pub skip_bad_names: bool,

    #[arg(long = "no-progress", help = "Do not draw a progress bar")]
    pub no_progress: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        // File first, flags on top
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        config.input_path = args.file_or_path;
        if let Some(out) = args.out {
            config.output.export_root = out;
        }
        if args.mono {
            config.output.channels = ChannelMode::Mono;
        }
        if let Some(depth) = args.bit_depth {
            config.output.bit_depth = depth;
        }
        if let Some(jobs) = args.jobs {
            config.processing.jobs = jobs;
        }
        if let Some(policy) = args.on_duplicate {
            config.policy.duplicates = policy;
        }
        if args.skip_bad_names {
            config.policy.name_errors = NameErrorPolicy::Skip;
        }
        if args.no_progress {
            config.processing.progress = false;
        }
        if args.verbose {
            config.processing.verbose = true;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| XrniError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| XrniError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.export_root.as_os_str().is_empty() {
            return Err(XrniError::config("Output folder cannot be empty"));
        }

        if self.processing.jobs == 0 {
            return Err(XrniError::config("Job count must be greater than 0"));
        }
        if self.processing.jobs > num_cpus::get() * 2 {
            return Err(XrniError::config("Job count cannot exceed 2x logical CPU cores"));
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| XrniError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| XrniError::config(format!("Failed to write config file: {}", e)))
    }
}
