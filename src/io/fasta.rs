//! Offset-aware streaming FASTA record reader
//!
//! # Format
//!
//! FASTA format consists of:
//! - Header line starting with '>' followed by the sequence identifier
//! - One or more sequence lines (can be wrapped)
//!
//! Example:
//! ```text
//! >sequence1 description
//! GATTACAGATTACA
//! TGCATGCA
//! >sequence2
//! ACGTACGT
//! ```
//!
//! Unlike a plain streaming parser, this reader tracks the byte offset each
//! record's header starts at, so the index builder can store offsets and the
//! indexed backends can seek straight to one record.

use crate::error::{FetchError, Result};
use crate::io::source::{RecordAt, RecordSource};
use crate::types::SequenceRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// FASTA record reader that reports record start offsets and supports
/// seeking to a stored offset.
///
/// Reads one record at a time with reused line buffers; memory stays
/// bounded by the largest single record.
#[derive(Debug)]
pub struct FastaSource<R: BufRead + Seek> {
    reader: R,
    /// Byte position of the next unread line
    pos: u64,
    line_number: usize,
    /// Header line read ahead while scanning the previous record's
    /// sequence, with the offset it starts at
    pending: Option<(u64, String)>,
    finished: bool,
}

impl FastaSource<BufReader<File>> {
    /// Open a FASTA file for reading.
    ///
    /// An absent file is reported as [`FetchError::FileNotFound`] so callers
    /// can treat it as "this backend cannot answer".
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::FileNotFound {
                    path: path.as_ref().to_path_buf(),
                }
            } else {
                FetchError::Io(e)
            }
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead + Seek> FastaSource<R> {
    /// Create a source from any buffered, seekable reader.
    ///
    /// Useful for testing with in-memory cursors.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            pos: 0,
            line_number: 0,
            pending: None,
            finished: false,
        }
    }

    /// Read one line, returning (bytes consumed, trimmed content).
    fn read_line(&mut self, buf: &mut String) -> Result<usize> {
        buf.clear();
        let n = self.reader.read_line(buf)?;
        if n > 0 {
            self.line_number += 1;
        }
        Ok(n)
    }

    fn read_record(&mut self) -> Result<Option<RecordAt>> {
        if self.finished && self.pending.is_none() {
            return Ok(None);
        }

        let mut line = String::with_capacity(256);

        // Locate the header line, either read ahead already or next in
        // the stream. Blank lines between records are skipped.
        let (header_offset, header) = loop {
            if let Some(pending) = self.pending.take() {
                break pending;
            }
            let line_start = self.pos;
            let n = self.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                return Ok(None);
            }
            self.pos += n as u64;
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            if !trimmed.starts_with('>') {
                return Err(FetchError::InvalidFastaFormat {
                    line: self.line_number,
                    msg: format!("expected '>' at start of header, got: {}", trimmed),
                });
            }
            break (line_start, trimmed.to_string());
        };

        // Identifier is the first whitespace-delimited token after '>'
        let id = header[1..]
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string();

        // Sequence lines run until the next header or EOF
        let mut sequence = Vec::new();
        loop {
            let line_start = self.pos;
            let n = self.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                break;
            }
            self.pos += n as u64;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('>') {
                self.pending = Some((line_start, trimmed.to_string()));
                break;
            }
            sequence.extend_from_slice(trimmed.as_bytes());
        }

        Ok(Some(RecordAt {
            offset: header_offset,
            record: SequenceRecord::new(id, sequence),
        }))
    }
}

impl<R: BufRead + Seek> RecordSource for FastaSource<R> {
    fn seek(&mut self, offset: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        self.pending = None;
        self.finished = false;
        Ok(())
    }

    fn next_record(&mut self) -> Result<Option<RecordAt>> {
        self.read_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(data: &[u8]) -> FastaSource<Cursor<Vec<u8>>> {
        FastaSource::from_reader(Cursor::new(data.to_vec()))
    }

    #[test]
    fn test_single_record_with_offset() {
        let mut src = source(b">seq1\nGATTACA\n");
        let at = src.next_record().unwrap().unwrap();
        assert_eq!(at.offset, 0);
        assert_eq!(at.record.id, "seq1");
        assert_eq!(at.record.sequence, b"GATTACA");
        assert!(src.next_record().unwrap().is_none());
    }

    #[test]
    fn test_offsets_point_at_headers() {
        let data = b">seq1\nGATTACA\n>seq2\nACGT\nTT\n>seq3\nCCC\n";
        let mut src = source(data);

        let offsets: Vec<u64> = std::iter::from_fn(|| src.next_record().unwrap())
            .map(|r| r.offset)
            .collect();
        assert_eq!(offsets.len(), 3);
        for &off in &offsets {
            assert_eq!(data[off as usize], b'>');
        }
    }

    #[test]
    fn test_seek_then_parse_one() {
        let data = b">seq1\nGATTACA\n>seq2\nACGT\n";
        let mut src = source(data);

        // Consume everything, then seek back to seq2's header
        let first = src.next_record().unwrap().unwrap();
        let second = src.next_record().unwrap().unwrap();
        assert!(src.next_record().unwrap().is_none());

        src.seek(second.offset).unwrap();
        let again = src.next_record().unwrap().unwrap();
        assert_eq!(again.record.id, "seq2");
        assert_eq!(again.record.sequence, b"ACGT");

        src.seek(first.offset).unwrap();
        assert_eq!(src.next_record().unwrap().unwrap().record.id, "seq1");
    }

    #[test]
    fn test_multiline_sequence_joined() {
        let mut src = source(b">seq1\nGATT\nACA\n>seq2\nACGT\n");
        let r = src.next_record().unwrap().unwrap();
        assert_eq!(r.record.sequence, b"GATTACA");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut src = source(b"\n>seq1\n\nGATTACA\n\n>seq2\nACGT\n");
        let r1 = src.next_record().unwrap().unwrap();
        assert_eq!(r1.record.id, "seq1");
        assert_eq!(r1.record.sequence, b"GATTACA");
        let r2 = src.next_record().unwrap().unwrap();
        assert_eq!(r2.record.id, "seq2");
    }

    #[test]
    fn test_empty_sequence_record_returned() {
        // A header with no sequence is returned with an empty sequence;
        // the index builder is the layer that skips these.
        let mut src = source(b">seq1\n>seq2\nACGT\n");
        let r1 = src.next_record().unwrap().unwrap();
        assert_eq!(r1.record.id, "seq1");
        assert!(r1.record.is_empty());
        let r2 = src.next_record().unwrap().unwrap();
        assert_eq!(r2.record.id, "seq2");
    }

    #[test]
    fn test_garbage_before_header_is_error() {
        let mut src = source(b"GATTACA\n");
        let err = src.next_record().unwrap_err();
        assert!(matches!(err, FetchError::InvalidFastaFormat { .. }));
    }

    #[test]
    fn test_empty_file() {
        let mut src = source(b"");
        assert!(src.next_record().unwrap().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let err = FastaSource::open("/nonexistent/nope.fa").unwrap_err();
        assert!(matches!(err, FetchError::FileNotFound { .. }));
    }
}
