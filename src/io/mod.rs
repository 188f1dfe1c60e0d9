//! I/O module: record sources over raw data files
//!
//! [`FastaSource`] is the in-crate FASTA reader; container formats plug in
//! through the [`RecordSource`] trait and a [`SourceOpener`] factory.

mod fasta;
pub mod source;

pub use fasta::FastaSource;
pub use source::{ContainerMode, RecordAt, RecordSource, SourceOpener};
