//! Integration tests for index construction, loading, and merging

use seqfetch::index::{build_fasta_index, MergedIndex, SortedIndex};
use seqfetch::FetchError;
use std::fs;
use std::path::{Path, PathBuf};

fn write_fasta(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_build_load_search_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut contents = String::new();
    let ids: Vec<String> = (0..25).map(|i| format!("SEQ{:03}", i)).collect();
    for id in &ids {
        contents.push_str(&format!(">{} some description\nACGTACGT\nTTTT\n", id));
    }
    let fa = write_fasta(dir.path(), "library.fa", &contents);

    let idx_path = build_fasta_index(&fa).expect("Failed to build index");
    let index = SortedIndex::load(&idx_path).expect("Failed to load index");
    assert_eq!(index.len(), ids.len());
    assert!(index.is_ordered());

    // Every offset seeks to the start of that record's header line
    let data = fs::read(&fa).unwrap();
    for id in &ids {
        let offset = index.search(id).expect("identifier missing from index") as usize;
        assert_eq!(data[offset], b'>');
        let header_id: String = data[offset + 1..]
            .iter()
            .take_while(|&&b| !b.is_ascii_whitespace())
            .map(|&b| b as char)
            .collect();
        assert_eq!(&header_id, id);
    }

    assert_eq!(index.search("SEQ999"), None);
}

#[test]
fn test_build_twice_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let fa = write_fasta(
        dir.path(),
        "genome.fa",
        ">zeta\nAAAA\n>Alpha\nCCCC\n>mid\nGGGG\n",
    );

    let idx_path = build_fasta_index(&fa).unwrap();
    let first = fs::read(&idx_path).unwrap();
    build_fasta_index(&fa).unwrap();
    let second = fs::read(&idx_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_out_of_order_index_is_diagnosed_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let idx_path = dir.path().join("bad.idx");
    fs::write(&idx_path, "B\t10\nA\t0\nC\t20\n").unwrap();

    let index = SortedIndex::load(&idx_path).expect("out-of-order index must still load");
    assert!(!index.is_ordered());
    assert_eq!(index.disorder_at(), Some(1));

    // Results may be unreliable, but no search may read out of bounds
    let _ = index.search("A");
    let _ = index.search("B");
    let _ = index.search("C");
    let _ = index.search("does-not-exist");
}

#[test]
fn test_empty_and_missing_index_files() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.idx");
    fs::write(&empty, "").unwrap();

    assert!(matches!(
        SortedIndex::load(&empty),
        Err(FetchError::IndexEmpty { .. })
    ));
    assert!(matches!(
        SortedIndex::load(dir.path().join("absent.idx")),
        Err(FetchError::FileNotFound { .. })
    ));
}

#[test]
fn test_merged_matches_per_file_search() {
    let dir = tempfile::tempdir().unwrap();
    // Three data files with disjoint identifier sets
    let mut idx_paths = Vec::new();
    for (name, records) in [
        ("chr1", vec!["a1", "a2", "a3"]),
        ("chr2", vec!["b1", "b2"]),
        ("chr3", vec!["c1"]),
    ] {
        let mut contents = String::new();
        for id in &records {
            contents.push_str(&format!(">{}\nACGT\n", id));
        }
        let fa = write_fasta(dir.path(), &format!("{}.fa", name), &contents);
        idx_paths.push(build_fasta_index(&fa).unwrap());
    }

    let merged = MergedIndex::rebuild(dir.path()).expect("Failed to rebuild merged index");
    assert_eq!(merged.source_count(), 3);
    assert_eq!(merged.len(), 6);

    for idx_path in &idx_paths {
        let single = SortedIndex::load(idx_path).unwrap();
        for i in 0..single.len() {
            let id = single.entry(i).identifier.clone();
            let (owner, offset) = merged
                .search(&id)
                .expect("merged index missing an identifier");
            assert_eq!(owner.source_stem(), single.source_stem());
            assert_eq!(Some(offset), single.search(&id));
        }
    }
}

#[test]
fn test_merged_rebuild_picks_up_new_files() {
    let dir = tempfile::tempdir().unwrap();
    let fa1 = write_fasta(dir.path(), "one.fa", ">first\nAAAA\n");
    build_fasta_index(&fa1).unwrap();

    let merged = MergedIndex::rebuild(dir.path()).unwrap();
    assert_eq!(merged.len(), 1);
    assert!(merged.search("second").is_none());

    let fa2 = write_fasta(dir.path(), "two.fa", ">second\nCCCC\n");
    build_fasta_index(&fa2).unwrap();

    // The old generation stays usable; a new rebuild sees the new file
    assert!(merged.search("first").is_some());
    let rebuilt = MergedIndex::rebuild(dir.path()).unwrap();
    assert!(rebuilt.search("first").is_some());
    assert!(rebuilt.search("second").is_some());
}
