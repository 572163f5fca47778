//! Sample name parsing
//!
//! Renoise stores samples as `SampleData/Sample<NN> (<name>).<ext>`. The
//! human readable part is recovered with a fixed pattern compiled once and
//! handed to whoever needs it.

use regex::Regex;
use crate::error::{XrniError, Result};

/// `Sample` + digits, optional whitespace and `(`, then the name up to the next paren
pub const CANONICAL_PATTERN: &str = r"Sample\d+\s*\(?([^()]*)";

#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    pub fn canonical() -> Result<Self> {
        Self::new(CANONICAL_PATTERN)
    }

    /// Build from a custom pattern; capture group 1 must hold the name
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| XrniError::config(format!("Invalid sample name pattern: {}", e)))?;
        if regex.captures_len() < 2 {
            return Err(XrniError::config("Sample name pattern needs a capture group"));
        }
        Ok(Self { regex })
    }

    /// Extract the sample name from an extension-less entry path
    pub fn extract(&self, stem: &str) -> Result<String> {
        let name = self.regex
            .captures(stem)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| XrniError::name_extraction(stem))?;

        Ok(name.replace(['/', '\\'], "_"))
    }

    /// Name and lowercase extension for a full entry path
    pub fn parse_entry(&self, entry: &str) -> Result<(String, String)> {
        let (stem, extension) = split_extension(entry);
        let name = self.extract(stem).map_err(|_| XrniError::name_extraction(entry))?;
        Ok((name, extension))
    }
}

/// Split `dir/file.ext` into (`dir/file`, `ext`); the extension is lowercased
pub fn split_extension(path: &str) -> (&str, String) {
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = file_start + dot;
            (&path[..dot], path[dot + 1..].to_ascii_lowercase())
        }
        _ => (path, String::new()),
    }
}
