//! ZIP archive reader

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;
use crate::error::{ArchiveError, Result};

/// Read-only view of one instrument archive.
///
/// Entry names are captured once at open time in central directory order,
/// so [`ArchiveReader::entries`] can be iterated any number of times.
pub struct ArchiveReader<R: Read + Seek = BufReader<File>> {
    path: PathBuf,
    archive: ZipArchive<R>,
    names: Vec<String>,
}

impl ArchiveReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ArchiveError::NotFound(path.to_path_buf()),
            _ => ArchiveError::Corrupt { path: path.to_path_buf(), message: e.to_string() },
        })?;

        Self::from_reader(BufReader::new(file), path)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Wrap an already opened source; `path` is only used for diagnostics.
    pub fn from_reader<P: AsRef<Path>>(reader: R, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let corrupt = |e: ZipError| ArchiveError::Corrupt { path: path.clone(), message: e.to_string() };

        let mut archive = ZipArchive::new(reader).map_err(corrupt)?;

        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i).map_err(corrupt)?;
            names.push(entry.name().to_string());
        }

        log::debug!("Opened {} ({} entries)", path.display(), names.len());

        Ok(Self { path, archive, names })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All entry paths in listing order
    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Stream one entry's decompressed bytes
    pub fn open_entry(&mut self, entry: &str) -> Result<impl Read + '_> {
        let path = &self.path;
        self.archive.by_name(entry).map_err(|e| match e {
            ZipError::FileNotFound => ArchiveError::EntryMissing { entry: entry.to_string() }.into(),
            other => ArchiveError::Corrupt { path: path.clone(), message: other.to_string() }.into(),
        })
    }

    /// Read one entry fully into memory
    pub fn read_entry(&mut self, entry: &str) -> Result<Vec<u8>> {
        let path = self.path.clone();
        let mut stream = self.open_entry(entry)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).map_err(|e| ArchiveError::Corrupt {
            path,
            message: format!("failed to read {}: {}", entry, e),
        })?;
        Ok(bytes)
    }
}
