//! Directory-wide union of per-file indexes, presented as one sorted
//! lookup table.
//!
//! A genome split across per-chromosome files carries one `.idx` per data
//! file; [`MergedIndex`] loads them all and answers "which file holds this
//! identifier, and at what offset". A rebuild produces a brand-new value;
//! the owner replaces its cached slot wholesale, so an index from the
//! previous generation stays valid for any in-flight fetch still holding it.

use crate::error::{FetchError, Result};
use crate::index::sorted::{cmp_ignore_case, SortedIndex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Position of one identifier inside the merged ordering: indices into the
/// merged index's own source list and that source's entries. Non-owning
/// back-reference without self-referential borrows.
#[derive(Debug, Clone, Copy)]
struct MergedEntry {
    source: usize,
    entry: usize,
}

/// Globally sorted lookup table over every index file in one directory
#[derive(Debug)]
pub struct MergedIndex {
    sources: Vec<SortedIndex>,
    order: Vec<MergedEntry>,
}

impl MergedIndex {
    /// Build a merged index over every `.idx` file in `directory`.
    ///
    /// Index files that fail to load (absent, empty, unreadable) are
    /// warned about and skipped; the merge proceeds with the rest.
    ///
    /// # Errors
    ///
    /// [`FetchError::FileNotFound`] when the directory itself is absent.
    pub fn rebuild<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        let mut idx_files: Vec<PathBuf> = fs::read_dir(directory)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::FileNotFound {
                        path: directory.to_path_buf(),
                    }
                } else {
                    FetchError::Io(e)
                }
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.file_name().is_some_and(|n| n.to_string_lossy().contains(".idx")))
            .collect();
        idx_files.sort();

        let mut sources = Vec::with_capacity(idx_files.len());
        let mut total = 0usize;
        for path in idx_files {
            match SortedIndex::load(&path) {
                Ok(index) => {
                    total += index.len();
                    sources.push(index);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unloadable index file");
                }
            }
        }

        let mut order = Vec::with_capacity(total);
        for (source, index) in sources.iter().enumerate() {
            for entry in 0..index.len() {
                order.push(MergedEntry { source, entry });
            }
        }
        // Stable sort: ties between sources keep their original relative order
        order.sort_by(|a, b| {
            cmp_ignore_case(
                &sources[a.source].entry(a.entry).identifier,
                &sources[b.source].entry(b.entry).identifier,
            )
        });

        debug!(
            directory = %directory.display(),
            sources = sources.len(),
            entries = order.len(),
            "merged index rebuilt"
        );
        Ok(Self { sources, order })
    }

    /// Binary search for an identifier across every source index.
    ///
    /// On a match, the offset is obtained by re-running the owning index's
    /// own search; the merge only orders identifiers.
    pub fn search(&self, identifier: &str) -> Option<(&SortedIndex, u64)> {
        if identifier.is_empty() || self.order.is_empty() {
            return None;
        }
        let i = self
            .order
            .binary_search_by(|e| {
                cmp_ignore_case(
                    &self.sources[e.source].entry(e.entry).identifier,
                    identifier,
                )
            })
            .ok()?;
        let owner = &self.sources[self.order[i].source];
        let offset = owner.search(identifier)?;
        Some((owner, offset))
    }

    /// Total entry count across all sources
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no source index contributed any entry
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of source index files that loaded
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}
