//! Fetch backends: pluggable strategies turning an identifier into a record.
//!
//! Each strategy is one variant of [`FetchBackend`], dispatched with a
//! `match` over its tag. The [`BackendRegistry`] owns the enabled backends
//! and tries them in registration order until one answers.

mod indexed;
mod linear;
mod registry;

pub use indexed::{DirectoryIndexedContainer, DirectoryIndexedFasta, SingleFileIndexedFasta};
pub use linear::LinearFastaLibrary;
pub use registry::BackendRegistry;

use crate::error::Result;
use crate::io::{ContainerMode, SourceOpener};
use crate::types::SequenceRecord;
use std::path::PathBuf;

/// Tag identifying one retrieval strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Sequential scan over un-indexed FASTA library files
    LinearFastaLibrary,
    /// One raw FASTA file with one `.idx` side-file
    SingleFileIndexedFasta,
    /// Directory of indexed FASTA files
    DirectoryIndexedFasta,
    /// Directory of indexed container files
    DirectoryIndexedContainer,
}

/// Configuration handed to [`BackendRegistry::enable`]
pub enum BackendConfig {
    /// Ordered list of FASTA library files to scan
    LinearFastaLibrary {
        /// Library files, in scan order
        files: Vec<PathBuf>,
    },
    /// One indexed FASTA file
    SingleFileIndexedFasta {
        /// Path of the raw data file
        data_file: PathBuf,
    },
    /// Directory of indexed FASTA files
    DirectoryIndexedFasta {
        /// Directory holding `.fa`/`.fsa` files and their `.idx` side-files
        directory: PathBuf,
    },
    /// Directory of indexed container files
    DirectoryIndexedContainer {
        /// Directory holding container files and their `.idx` side-files
        directory: PathBuf,
        /// Binary or text container encoding
        mode: ContainerMode,
        /// Opens a container file as a record source
        opener: SourceOpener,
    },
}

impl BackendConfig {
    /// The kind of backend this configuration constructs
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::LinearFastaLibrary { .. } => BackendKind::LinearFastaLibrary,
            BackendConfig::SingleFileIndexedFasta { .. } => BackendKind::SingleFileIndexedFasta,
            BackendConfig::DirectoryIndexedFasta { .. } => BackendKind::DirectoryIndexedFasta,
            BackendConfig::DirectoryIndexedContainer { .. } => {
                BackendKind::DirectoryIndexedContainer
            }
        }
    }
}

/// One enabled retrieval strategy
pub enum FetchBackend {
    /// Sequential FASTA library scan
    Linear(LinearFastaLibrary),
    /// Single-file indexed FASTA
    SingleIndexed(SingleFileIndexedFasta),
    /// Directory indexed FASTA
    DirectoryIndexed(DirectoryIndexedFasta),
    /// Directory indexed container
    DirectoryContainer(DirectoryIndexedContainer),
}

impl FetchBackend {
    /// Construct the backend a configuration describes
    pub fn from_config(config: BackendConfig) -> Self {
        match config {
            BackendConfig::LinearFastaLibrary { files } => {
                FetchBackend::Linear(LinearFastaLibrary::new(files))
            }
            BackendConfig::SingleFileIndexedFasta { data_file } => {
                FetchBackend::SingleIndexed(SingleFileIndexedFasta::new(data_file))
            }
            BackendConfig::DirectoryIndexedFasta { directory } => {
                FetchBackend::DirectoryIndexed(DirectoryIndexedFasta::new(directory))
            }
            BackendConfig::DirectoryIndexedContainer {
                directory,
                mode,
                opener,
            } => FetchBackend::DirectoryContainer(DirectoryIndexedContainer::new(
                directory, mode, opener,
            )),
        }
    }

    /// This backend's kind tag
    pub fn kind(&self) -> BackendKind {
        match self {
            FetchBackend::Linear(_) => BackendKind::LinearFastaLibrary,
            FetchBackend::SingleIndexed(_) => BackendKind::SingleFileIndexedFasta,
            FetchBackend::DirectoryIndexed(_) => BackendKind::DirectoryIndexedFasta,
            FetchBackend::DirectoryContainer(_) => BackendKind::DirectoryIndexedContainer,
        }
    }

    /// Open files / load indexes immediately (eager enable)
    pub fn prepare(&mut self) -> Result<()> {
        match self {
            FetchBackend::Linear(b) => b.prepare(),
            FetchBackend::SingleIndexed(b) => b.prepare(),
            FetchBackend::DirectoryIndexed(b) => b.prepare(),
            FetchBackend::DirectoryContainer(b) => b.prepare(),
        }
    }

    /// Try to answer a lookup. `Ok(None)` means "this backend cannot
    /// answer"; `Err` means the backend found the record's location but
    /// failed to materialize it.
    pub fn fetch(&mut self, identifier: &str) -> Result<Option<SequenceRecord>> {
        match self {
            FetchBackend::Linear(b) => b.fetch(identifier),
            FetchBackend::SingleIndexed(b) => b.fetch(identifier),
            FetchBackend::DirectoryIndexed(b) => b.fetch(identifier),
            FetchBackend::DirectoryContainer(b) => b.fetch(identifier),
        }
    }
}
