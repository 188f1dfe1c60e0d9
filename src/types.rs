//! Common types used throughout seqfetch

/// Molecule classification for a fetched sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoleculeKind {
    /// DNA/RNA sequence
    Nucleic,
    /// Protein sequence
    Protein,
}

impl MoleculeKind {
    /// Classify residues with a majority-vote check: if at least one quarter
    /// of the alphabetic residues fall outside `ACGTUN` (case-insensitive),
    /// the sequence is protein, otherwise nucleic acid.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqfetch::MoleculeKind;
    ///
    /// assert_eq!(MoleculeKind::classify(b"ACGTACGTNNNU"), MoleculeKind::Nucleic);
    /// assert_eq!(MoleculeKind::classify(b"MKWVTFISLLLLFSSAYS"), MoleculeKind::Protein);
    /// ```
    pub fn classify(sequence: &[u8]) -> MoleculeKind {
        let mut alphabetic = 0u64;
        let mut outside = 0u64;

        for &b in sequence {
            if b.is_ascii_alphabetic() {
                alphabetic += 1;
                if !matches!(
                    b.to_ascii_uppercase(),
                    b'A' | b'C' | b'G' | b'T' | b'U' | b'N'
                ) {
                    outside += 1;
                }
            }
        }

        if alphabetic > 0 && outside * 4 >= alphabetic {
            MoleculeKind::Protein
        } else {
            MoleculeKind::Nucleic
        }
    }
}

/// A sequence record produced by a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Primary identifier (without '>' prefix)
    pub id: String,
    /// Sequence residues
    pub sequence: Vec<u8>,
    /// Nucleic acid vs. protein classification
    pub kind: MoleculeKind,
}

impl SequenceRecord {
    /// Create a new record, classifying its residues
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        let kind = MoleculeKind::classify(&sequence);
        Self { id, sequence, kind }
    }

    /// Check if the record has an empty sequence
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
