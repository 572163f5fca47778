//! Instrument Archive Access
//!
//! Opens XRNI containers (plain ZIP files) and picks out the entries that
//! hold sample audio.

pub mod reader;
pub mod filter;

pub use reader::ArchiveReader;
pub use filter::{SAMPLE_NAMESPACE, is_sample, sample_entries};
