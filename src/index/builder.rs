//! Index construction: scan a raw data file, emit a sorted `.idx` side-file.
//!
//! This is the only place identifier/offset pairs are produced. The builder
//! streams records through a [`RecordSource`], captures the byte offset each
//! record starts at, then sorts, deduplicates, and writes one
//! `identifier<TAB>offset` line per record.
//!
//! # Example
//!
//! ```no_run
//! use seqfetch::index::{build_fasta_index, SortedIndex};
//!
//! # fn main() -> seqfetch::Result<()> {
//! let idx_path = build_fasta_index("chr1.fa")?;
//! let index = SortedIndex::load(&idx_path)?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::index::sorted::cmp_ignore_case;
use crate::io::{ContainerMode, FastaSource, RecordSource, SourceOpener};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build an index for a FASTA file.
///
/// Writes `<path with final extension replaced by .idx>` and returns that
/// path.
pub fn build_fasta_index<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut source = FastaSource::open(path)?;
    write_index_for(path, &mut source)
}

/// Build an index for a container file opened through `opener`.
///
/// Each record handle is dropped as soon as its identifier and offset are
/// captured, keeping memory bounded on multi-gigabyte container scans.
pub fn build_container_index<P: AsRef<Path>>(
    path: P,
    mode: ContainerMode,
    opener: &SourceOpener,
) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut source = opener(path, mode)?;
    write_index_for(path, source.as_mut())
}

fn write_index_for(data_path: &Path, source: &mut dyn RecordSource) -> Result<PathBuf> {
    let entries = scan_entries(source)?;
    let idx_path = data_path.with_extension("idx");
    write_index(&idx_path, &entries)?;
    debug!(
        data = %data_path.display(),
        index = %idx_path.display(),
        entries = entries.len(),
        "index built"
    );
    Ok(idx_path)
}

/// Accumulate one (identifier, offset) pair per record with non-empty
/// sequence content, sorted and deduplicated.
fn scan_entries(source: &mut dyn RecordSource) -> Result<Vec<(String, u64)>> {
    let mut entries: Vec<(String, u64)> = Vec::new();
    while let Some(at) = source.next_record()? {
        if at.record.id.is_empty() || at.record.is_empty() {
            continue;
        }
        entries.push((at.record.id, at.offset));
        // at.record drops here, releasing the parsed sequence before the
        // next record is materialized
    }

    entries.sort_by(|a, b| match cmp_ignore_case(&a.0, &b.0) {
        Ordering::Equal => a.cmp(b),
        other => other,
    });
    entries.dedup();
    Ok(entries)
}

/// Write sorted entries to an index file, one `identifier<TAB>offset` line
/// per entry, no header.
fn write_index(idx_path: &Path, entries: &[(String, u64)]) -> Result<()> {
    let mut out = BufWriter::new(File::create(idx_path)?);
    for (identifier, offset) in entries {
        writeln!(out, "{}\t{}", identifier, offset)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SortedIndex;
    use std::fs;

    fn write_fasta(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_build_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let fa = write_fasta(
            dir.path(),
            "test.fa",
            ">beta\nACGT\n>alpha\nGGGG\nCCCC\n>gamma\nTTTT\n",
        );

        let idx_path = build_fasta_index(&fa).unwrap();
        assert_eq!(idx_path, dir.path().join("test.idx"));

        let index = SortedIndex::load(&idx_path).unwrap();
        assert_eq!(index.len(), 3);
        assert!(index.is_ordered());

        // Every offset points at the start of that record's header line
        let data = fs::read(&fa).unwrap();
        for id in ["alpha", "beta", "gamma"] {
            let off = index.search(id).unwrap() as usize;
            assert_eq!(data[off], b'>');
            let header: String = data[off + 1..]
                .iter()
                .take_while(|&&b| b != b'\n')
                .map(|&b| b as char)
                .collect();
            assert_eq!(header, id);
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let fa = write_fasta(dir.path(), "test.fa", ">b\nAC\n>a\nGG\n>c\nTT\n");

        let idx_path = build_fasta_index(&fa).unwrap();
        let first = fs::read(&idx_path).unwrap();
        build_fasta_index(&fa).unwrap();
        let second = fs::read(&idx_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_sequence_records_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let fa = write_fasta(dir.path(), "test.fa", ">empty\n>full\nACGT\n");

        let idx_path = build_fasta_index(&fa).unwrap();
        let index = SortedIndex::load(&idx_path).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.search("full").is_some());
        assert_eq!(index.search("empty"), None);
    }

    #[test]
    fn test_exact_duplicates_removed() {
        let mut entries = vec![
            ("a".to_string(), 0u64),
            ("A".to_string(), 0u64),
            ("a".to_string(), 0u64),
        ];
        entries.sort_by(|a, b| match cmp_ignore_case(&a.0, &b.0) {
            Ordering::Equal => a.cmp(b),
            other => other,
        });
        entries.dedup();
        // Case variants are distinct lines; exact duplicates collapse
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_output_sorted_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let fa = write_fasta(dir.path(), "test.fa", ">Zed\nAA\n>apple\nCC\n>MID\nGG\n");

        let idx_path = build_fasta_index(&fa).unwrap();
        let contents = fs::read_to_string(&idx_path).unwrap();
        let ids: Vec<&str> = contents
            .lines()
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["apple", "MID", "Zed"]);
    }

    #[test]
    fn test_missing_data_file() {
        let err = build_fasta_index("/nonexistent/x.fa").unwrap_err();
        assert!(err.is_degraded());
    }
}
