//! seqfetch: indexed retrieval of biological sequence records
//!
//! # Overview
//!
//! seqfetch locates a single sequence record by identifier inside large flat
//! files (FASTA or a record container) without scanning the whole file,
//! using sorted on-disk `.idx` side-files and case-insensitive binary
//! search.
//!
//! ## Key Pieces
//!
//! - **SortedIndex**: one `.idx` file in memory, identifier → byte offset
//! - **Index builders**: scan a raw data file and write its `.idx`
//! - **MergedIndex**: directory-wide union of per-file indexes
//! - **Fetch backends**: linear scan, single-file indexed, directory
//!   indexed (FASTA or container)
//! - **BackendRegistry**: ordered backends, first to answer wins
//!
//! ## Quick Start
//!
//! ```no_run
//! use seqfetch::{BackendConfig, BackendRegistry};
//! use seqfetch::index::build_fasta_index;
//!
//! # fn main() -> seqfetch::Result<()> {
//! // Offline: build the index side-file once
//! build_fasta_index("genome.fa")?;
//!
//! // Online: enable backends and look records up
//! let mut registry = BackendRegistry::new();
//! registry.enable(
//!     BackendConfig::SingleFileIndexedFasta { data_file: "genome.fa".into() },
//!     false,
//! )?;
//!
//! if let Some(record) = registry.dispatch("AB000001") {
//!     println!("{}: {} residues", record.id, record.sequence.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! The engine is single-threaded and synchronous. Cached indexes are
//! replaced wholesale on rebuild, never mutated in place, so a reference
//! from the previous generation stays valid until dropped. Index trouble
//! (missing file, empty file, out-of-order entries) degrades the affected
//! backend to "cannot answer" instead of failing the process.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod fetch;
pub mod index;
pub mod io;
pub mod types;

// Re-export commonly used types
pub use error::{FetchError, Result};
pub use fetch::{BackendConfig, BackendKind, BackendRegistry, FetchBackend};
pub use io::{ContainerMode, FastaSource, RecordAt, RecordSource, SourceOpener};
pub use types::{MoleculeKind, SequenceRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
