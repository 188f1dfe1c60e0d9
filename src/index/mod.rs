//! Sorted on-disk indexes: load, build, and directory-wide merge.
//!
//! - [`SortedIndex`]: one `.idx` file in memory, binary-searched by
//!   case-insensitive identifier
//! - [`build_fasta_index`] / [`build_container_index`]: produce `.idx`
//!   side-files from raw data files
//! - [`MergedIndex`]: union of every `.idx` in a directory

mod builder;
mod merged;
pub(crate) mod sorted;

pub use builder::{build_container_index, build_fasta_index};
pub use merged::MergedIndex;
pub use sorted::{IndexEntry, SortedIndex};
