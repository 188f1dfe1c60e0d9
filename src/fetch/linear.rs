//! Linear FASTA library scan: the un-indexed fallback backend.
//!
//! Walks an ordered list of FASTA library files top to bottom looking for a
//! header whose leading token carries the requested identifier as a whole
//! token. Arbitrarily slow on large files by design; the indexed backends
//! exist to avoid this cost.

use crate::error::{FetchError, Result};
use crate::types::SequenceRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::debug;

/// Whole-token identifier match inside a header's leading token.
///
/// The identifier may sit anywhere in the token (`gi|123|ref|ABC|` matches
/// `ABC`), but the character after the match must be non-alphanumeric, so a
/// search for `ABC` never matches `ABC1`. Comparison ignores ASCII case.
fn header_matches(header: &str, identifier: &str) -> bool {
    let token = header
        .trim_start_matches('>')
        .split_whitespace()
        .next()
        .unwrap_or("");
    if identifier.is_empty() || token.len() < identifier.len() {
        return false;
    }

    let token_lower = token.to_ascii_lowercase();
    let id_lower = identifier.to_ascii_lowercase();
    for (at, _) in token_lower.match_indices(&id_lower) {
        match token.as_bytes().get(at + identifier.len()) {
            Some(next) if next.is_ascii_alphanumeric() => continue,
            _ => return true,
        }
    }
    false
}

/// Scans FASTA library files sequentially for an identifier
pub struct LinearFastaLibrary {
    files: Vec<PathBuf>,
    /// Most recently fetched (identifier, record); a repeat request is
    /// answered from here without rescanning
    last: Option<(String, SequenceRecord)>,
}

impl LinearFastaLibrary {
    /// Create a backend over an ordered list of FASTA library files
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files, last: None }
    }

    /// Verify the first library file can be opened (eager enable)
    pub fn prepare(&mut self) -> Result<()> {
        match self.files.first() {
            Some(path) => {
                File::open(path).map_err(|_| FetchError::FileNotFound {
                    path: path.clone(),
                })?;
                Ok(())
            }
            None => Err(FetchError::InvalidInput {
                msg: "linear FASTA library has no files".to_string(),
            }),
        }
    }

    /// Scan the library files for an identifier.
    ///
    /// Files are opened one at a time, lazily, in list order; a file that
    /// cannot be opened is skipped. Returns `Ok(None)` when no file holds
    /// the identifier.
    pub fn fetch(&mut self, identifier: &str) -> Result<Option<SequenceRecord>> {
        if identifier.is_empty() {
            return Ok(None);
        }
        if let Some((cached_id, record)) = &self.last {
            if cached_id.eq_ignore_ascii_case(identifier) {
                return Ok(Some(record.clone()));
            }
        }

        for path in &self.files {
            let file = match File::open(path) {
                Ok(f) => f,
                Err(_) => {
                    debug!(path = %path.display(), "library file not openable, skipping");
                    continue;
                }
            };
            if let Some(sequence) = scan_file(BufReader::new(file), identifier)? {
                let record = SequenceRecord::new(identifier.to_string(), sequence);
                self.last = Some((identifier.to_string(), record.clone()));
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

/// Scan one file from the top; on a header match, assemble the sequence
/// through to the next header or EOF.
fn scan_file<R: BufRead>(mut reader: R, identifier: &str) -> Result<Option<Vec<u8>>> {
    let mut line = String::with_capacity(256);
    let mut sequence: Option<Vec<u8>> = None;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(sequence);
        }
        let trimmed = line.trim_end();
        if trimmed.starts_with('>') {
            if sequence.is_some() {
                // Next header ends the matched record
                return Ok(sequence);
            }
            if header_matches(trimmed, identifier) {
                sequence = Some(Vec::new());
            }
        } else if let Some(seq) = sequence.as_mut() {
            seq.extend_from_slice(trimmed.trim().as_bytes());
        }
    }
}
