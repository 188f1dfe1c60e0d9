//! Record source seam: the contract between the retrieval engine and
//! whatever parser materializes records from a raw data file.
//!
//! The engine never interprets record content. It only needs three things
//! from a source: report where a record starts, seek to a stored offset,
//! and parse one record forward from the current position. FASTA gets an
//! in-crate implementation ([`crate::io::FastaSource`]); container formats
//! are opened through a caller-supplied [`SourceOpener`].

use crate::error::Result;
use crate::types::SequenceRecord;
use std::path::Path;

/// A record paired with the byte offset its representation starts at
/// in the underlying file.
#[derive(Debug, Clone)]
pub struct RecordAt {
    /// Byte offset of the start of the record (for FASTA, the `>` of its
    /// header line)
    pub offset: u64,
    /// The parsed record
    pub record: SequenceRecord,
}

/// One seekable stream of records over a raw data file.
///
/// Implementations hold the open file handle; dropping the source closes it.
pub trait RecordSource {
    /// Reposition the stream to an absolute byte offset, discarding any
    /// read-ahead state.
    fn seek(&mut self, offset: u64) -> Result<()>;

    /// Parse the next record forward from the current position.
    ///
    /// Returns `Ok(None)` at end of file. The returned offset is the
    /// position the record starts at, captured before parsing.
    fn next_record(&mut self) -> Result<Option<RecordAt>>;
}

/// Whether a container file should be opened as binary or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMode {
    /// Binary container encoding
    Binary,
    /// Text container encoding
    Text,
}

/// Factory that opens a container file as a [`RecordSource`].
///
/// The index builder passes the container file's own path; the directory
/// backends pass the derived file stem (path without extension). The opener
/// owns the container format's naming and encoding details.
pub type SourceOpener = Box<dyn Fn(&Path, ContainerMode) -> Result<Box<dyn RecordSource>>>;
