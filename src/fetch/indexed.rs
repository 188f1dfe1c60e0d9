//! Index-backed fetch: map identifier → byte offset, seek, parse one record.
//!
//! Three variants share the shape: a cached index slot (replaced wholesale,
//! never mutated in place), an offset lookup, and a seek-then-parse against
//! the raw data file. Index trouble degrades the backend to "cannot answer";
//! only parse failures surface as errors.

use crate::error::{FetchError, Result};
use crate::index::{MergedIndex, SortedIndex};
use crate::io::{ContainerMode, FastaSource, RecordSource, SourceOpener};
use crate::types::SequenceRecord;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Derive the per-chromosome file stem from an identifier following the
/// naming convention: a two-letter case-patterned prefix (upper then
/// lower), digits, then an underscore-delimited tag. `Hs10_25164` → `Hs10`.
fn derive_stem(identifier: &str) -> Option<&str> {
    let b = identifier.as_bytes();
    if b.len() < 4 || !b[0].is_ascii_uppercase() || !b[1].is_ascii_lowercase() {
        return None;
    }
    let mut i = 2;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i > 2 && b.get(i) == Some(&b'_') {
        Some(&identifier[..i])
    } else {
        None
    }
}

/// Open the raw FASTA file for a data stem, trying `.fa` then `.fsa`.
///
/// Returns `Ok(None)` when neither exists (the backend cannot answer).
fn open_fasta_at(stem: &Path) -> Result<Option<FastaSource<BufReader<File>>>> {
    for ext in ["fa", "fsa"] {
        match FastaSource::open(stem.with_extension(ext)) {
            Ok(source) => return Ok(Some(source)),
            Err(e) if e.is_degraded() => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// Seek to a stored offset and parse exactly one record.
fn parse_at(source: &mut dyn RecordSource, offset: u64) -> Result<SequenceRecord> {
    source.seek(offset)?;
    match source.next_record() {
        Ok(Some(at)) => Ok(at.record),
        Ok(None) => Err(FetchError::ParseFailure {
            offset,
            msg: "no record at indexed offset".to_string(),
        }),
        Err(FetchError::InvalidFastaFormat { msg, .. }) => {
            Err(FetchError::ParseFailure { offset, msg })
        }
        Err(e) => Err(e),
    }
}

/// Single raw FASTA file with one `.idx` side-file
pub struct SingleFileIndexedFasta {
    data_path: PathBuf,
    index: Option<SortedIndex>,
    index_failed: bool,
}

impl SingleFileIndexedFasta {
    /// Create a backend over one data file; the index loads lazily from
    /// the data path with its extension replaced by `.idx`.
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            data_path,
            index: None,
            index_failed: false,
        }
    }

    /// Load the index immediately (eager enable)
    pub fn prepare(&mut self) -> Result<()> {
        let index = SortedIndex::load(self.data_path.with_extension("idx"))?;
        self.index = Some(index);
        Ok(())
    }

    fn ensure_index(&mut self) -> Option<&SortedIndex> {
        if self.index.is_none() && !self.index_failed {
            let idx_path = self.data_path.with_extension("idx");
            match SortedIndex::load(&idx_path) {
                Ok(index) => self.index = Some(index),
                Err(e) => {
                    warn!(path = %idx_path.display(), error = %e, "index unavailable, backend degraded");
                    self.index_failed = true;
                }
            }
        }
        self.index.as_ref()
    }

    /// Look the identifier up in the index, then seek and parse.
    pub fn fetch(&mut self, identifier: &str) -> Result<Option<SequenceRecord>> {
        let offset = match self.ensure_index().and_then(|i| i.search(identifier)) {
            Some(offset) => offset,
            None => return Ok(None),
        };

        // The configured path is preferred; a missing `.fa` falls back
        // to `.fsa` with the same stem.
        let mut source = match FastaSource::open(&self.data_path) {
            Ok(source) => source,
            Err(e) if e.is_degraded() => {
                match open_fasta_at(&self.data_path.with_extension(""))? {
                    Some(source) => source,
                    None => return Ok(None),
                }
            }
            Err(e) => return Err(e),
        };
        parse_at(&mut source, offset).map(Some)
    }
}

/// Cached index state shared by the directory-of-files backends: one
/// per-stem SortedIndex slot for identifiers that follow the naming
/// convention, one MergedIndex slot for the rest.
struct DirectoryIndexes {
    directory: PathBuf,
    current: Option<SortedIndex>,
    merged: Option<MergedIndex>,
    merged_failed: bool,
}

impl DirectoryIndexes {
    fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            current: None,
            merged: None,
            merged_failed: false,
        }
    }

    /// Eagerly build the merged index (eager enable)
    fn prepare(&mut self) -> Result<()> {
        self.merged = Some(MergedIndex::rebuild(&self.directory)?);
        Ok(())
    }

    /// Map an identifier to (data file stem path, byte offset).
    ///
    /// Identifiers following the naming convention select their own
    /// per-stem index, reloaded only when the derived stem changes; all
    /// others go through the merged index over the whole directory.
    fn resolve(&mut self, identifier: &str) -> Option<(PathBuf, u64)> {
        if let Some(stem) = derive_stem(identifier) {
            let stale = self
                .current
                .as_ref()
                .is_none_or(|c| !c.source_stem().eq_ignore_ascii_case(stem));
            if stale {
                let idx_path = self.directory.join(format!("{}.idx", stem));
                match SortedIndex::load(&idx_path) {
                    Ok(index) => self.current = Some(index),
                    Err(e) => {
                        debug!(path = %idx_path.display(), error = %e, "derived index not loadable");
                        self.current = None;
                    }
                }
            }
            if let Some(current) = &self.current {
                if current.source_stem().eq_ignore_ascii_case(stem) {
                    if let Some(offset) = current.search(identifier) {
                        return Some((current.data_stem(), offset));
                    }
                }
            }
        }

        if self.merged.is_none() && !self.merged_failed {
            match MergedIndex::rebuild(&self.directory) {
                Ok(merged) => self.merged = Some(merged),
                Err(e) => {
                    warn!(directory = %self.directory.display(), error = %e, "merged index unavailable, backend degraded");
                    self.merged_failed = true;
                }
            }
        }
        let (owner, offset) = self.merged.as_ref()?.search(identifier)?;
        Some((owner.data_stem(), offset))
    }
}

/// Directory of per-chromosome FASTA files, each with its own `.idx`
pub struct DirectoryIndexedFasta {
    indexes: DirectoryIndexes,
}

impl DirectoryIndexedFasta {
    /// Create a backend over a directory of indexed FASTA files
    pub fn new(directory: PathBuf) -> Self {
        Self {
            indexes: DirectoryIndexes::new(directory),
        }
    }

    /// Build the merged index immediately (eager enable)
    pub fn prepare(&mut self) -> Result<()> {
        self.indexes.prepare()
    }

    /// Resolve the identifier to a file and offset, then seek and parse.
    pub fn fetch(&mut self, identifier: &str) -> Result<Option<SequenceRecord>> {
        let (stem, offset) = match self.indexes.resolve(identifier) {
            Some(hit) => hit,
            None => return Ok(None),
        };
        let mut source = match open_fasta_at(&stem)? {
            Some(source) => source,
            None => return Ok(None),
        };
        parse_at(&mut source, offset).map(Some)
    }
}

/// Directory of per-chromosome container files, each with its own `.idx`.
///
/// Identical dispatch to [`DirectoryIndexedFasta`], but the raw file is
/// opened through the caller-supplied [`SourceOpener`] and seeking uses the
/// container source's own seek.
pub struct DirectoryIndexedContainer {
    indexes: DirectoryIndexes,
    mode: ContainerMode,
    opener: SourceOpener,
}

impl DirectoryIndexedContainer {
    /// Create a backend over a directory of indexed container files
    pub fn new(directory: PathBuf, mode: ContainerMode, opener: SourceOpener) -> Self {
        Self {
            indexes: DirectoryIndexes::new(directory),
            mode,
            opener,
        }
    }

    /// Build the merged index immediately (eager enable)
    pub fn prepare(&mut self) -> Result<()> {
        self.indexes.prepare()
    }

    /// Resolve the identifier, open the container, seek and parse.
    pub fn fetch(&mut self, identifier: &str) -> Result<Option<SequenceRecord>> {
        let (stem, offset) = match self.indexes.resolve(identifier) {
            Some(hit) => hit,
            None => return Ok(None),
        };
        let mut source = match (self.opener)(&stem, self.mode) {
            Ok(source) => source,
            Err(e) if e.is_degraded() => return Ok(None),
            Err(e) => return Err(e),
        };
        parse_at(source.as_mut(), offset).map(Some)
    }
}
