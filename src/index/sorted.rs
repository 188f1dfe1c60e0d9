//! On-disk identifier→offset index, loaded into memory for binary search.
//!
//! # Format
//!
//! One record per line, each line either `IDENTIFIER` or
//! `IDENTIFIER<TAB>OFFSET`, where OFFSET is the decimal byte offset of the
//! record's start in the corresponding raw data file. Lines are expected
//! sorted ascending by case-insensitive identifier. The index file carries
//! the raw data file's name with its final extension replaced by `.idx`:
//!
//! ```text
//! AB000001	0
//! ab000002	512
//! AB000010	1024
//! ```
//!
//! # Basic Usage
//!
//! ```no_run
//! use seqfetch::index::SortedIndex;
//!
//! # fn main() -> seqfetch::Result<()> {
//! let index = SortedIndex::load("chr1.idx")?;
//! if let Some(offset) = index.search("AB000002") {
//!     println!("record starts at byte {}", offset);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{FetchError, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Compare two identifiers ignoring ASCII case.
///
/// This is the single ordering used everywhere: index files are sorted
/// under it, and every binary search compares with it.
pub(crate) fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut ai = a.bytes().map(|c| c.to_ascii_lowercase());
    let mut bi = b.bytes().map(|c| c.to_ascii_lowercase());
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// One identifier→offset pair from an index file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Record identifier
    pub identifier: String,
    /// Byte offset of the record in the raw data file; absent when the
    /// index line had no tab or a non-numeric offset field
    pub offset: Option<u64>,
}

/// An index file loaded into memory, searchable by identifier
#[derive(Debug, Clone)]
pub struct SortedIndex {
    entries: Vec<IndexEntry>,
    /// Directory the index file (and its raw data file) live in
    source_dir: PathBuf,
    /// Index file name with the `.idx` extension stripped; the raw data
    /// file carries this stem with its own extension
    source_stem: String,
    /// First entry position where the sortedness check failed, if any
    disorder_at: Option<usize>,
}

impl SortedIndex {
    /// Load an index file into memory.
    ///
    /// The whole file is read in one buffer and split into owned
    /// (identifier, offset) pairs. After population the entries are walked
    /// once to confirm non-decreasing case-insensitive order; a violation
    /// is logged and recorded but does not fail the load — searches past
    /// the disorder point are unreliable.
    ///
    /// # Errors
    ///
    /// [`FetchError::FileNotFound`] when the file is absent,
    /// [`FetchError::IndexEmpty`] when it holds no entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buffer = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                FetchError::Io(e)
            }
        })?;

        let line_count = buffer.lines().count();
        if line_count == 0 {
            return Err(FetchError::IndexEmpty {
                path: path.to_path_buf(),
            });
        }

        let mut entries = Vec::with_capacity(line_count);
        for line in buffer.lines() {
            if line.is_empty() {
                continue;
            }
            let (identifier, offset) = match line.split_once('\t') {
                Some((id, text)) => (id.to_string(), text.parse::<u64>().ok()),
                None => (line.to_string(), None),
            };
            entries.push(IndexEntry { identifier, offset });
        }

        if entries.is_empty() {
            return Err(FetchError::IndexEmpty {
                path: path.to_path_buf(),
            });
        }

        let disorder_at = entries
            .windows(2)
            .position(|w| cmp_ignore_case(&w[0].identifier, &w[1].identifier) == Ordering::Greater)
            .map(|i| i + 1);
        if let Some(at) = disorder_at {
            warn!(
                path = %path.display(),
                entry = at,
                identifier = %entries[at].identifier,
                "index file out of order; searches near this entry are unreliable"
            );
        }

        let source_dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        let source_stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            entries,
            source_dir,
            source_stem,
            disorder_at,
        })
    }

    /// Binary search for an identifier, case-insensitively.
    ///
    /// Returns the stored offset, or `None` when the identifier is absent,
    /// the key is empty, the index is empty, or the matched entry carries
    /// no offset. Never reads out of bounds, even on an unsorted index.
    pub fn search(&self, identifier: &str) -> Option<u64> {
        if identifier.is_empty() || self.entries.is_empty() {
            return None;
        }
        match self
            .entries
            .binary_search_by(|e| cmp_ignore_case(&e.identifier, identifier))
        {
            Ok(i) => self.entries[i].offset,
            Err(_) => None,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// False when the load-time sortedness check found a decrease
    pub fn is_ordered(&self) -> bool {
        self.disorder_at.is_none()
    }

    /// Entry position of the first sortedness violation, if any
    pub fn disorder_at(&self) -> Option<usize> {
        self.disorder_at
    }

    /// Entry at a position, for merged-index iteration
    pub fn entry(&self, i: usize) -> &IndexEntry {
        &self.entries[i]
    }

    /// Directory the raw data file lives in
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Raw data file name without its extension
    pub fn source_stem(&self) -> &str {
        &self.source_stem
    }

    /// Raw data file path without extension (`source_dir/source_stem`)
    pub fn data_stem(&self) -> PathBuf {
        self.source_dir.join(&self.source_stem)
    }
}
