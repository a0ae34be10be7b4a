//! Index catalog and dense index-pair count tables.
//!
//! The catalog is built once from a tab-separated index definition file. From it two
//! [`PairTable`]s are derived: one holding every `(i, i)` pair (dual-matched) and one holding
//! every ordered `(i, j)` pair of distinct indexes (swapped). Both are fully populated at
//! construction, so updates during a run never insert keys; a lookup of an absent key is an
//! error.

use ahash::{AHashMap, AHashSet};
use fgoxide::io::Io;
use fqdemux_dna::is_acgt;
use log::{info, warn};
use std::fmt;
use std::io::BufRead;
use std::path::Path;

use crate::errors::{DemuxError, Result};

/// Zero-based column of the index definition file holding the index sequence.
pub const INDEX_COLUMN: usize = 4;

/// A directed pair of index sequences: the index 1 read and the reverse-complemented index 2
/// read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPair {
    /// Index 1 sequence.
    pub index1: String,
    /// Index 2 sequence, already reverse complemented.
    pub index2: String,
}

impl IndexPair {
    /// Creates a new pair.
    pub fn new(index1: impl Into<String>, index2: impl Into<String>) -> Self {
        Self { index1: index1.into(), index2: index2.into() }
    }

    /// True when both halves of the pair are the same sequence.
    #[must_use]
    pub fn is_dual_matched(&self) -> bool {
        self.index1 == self.index2
    }
}

impl fmt::Display for IndexPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.index1, self.index2)
    }
}

/// Counters for a fixed, ordered set of index pairs.
///
/// Keys are fixed at construction and iterate in construction order. Counts live in a `Vec`
/// parallel to the keys, with a hash lookup from key to slot.
#[derive(Debug, Clone, Default)]
pub struct PairTable {
    pairs: Vec<IndexPair>,
    counts: Vec<u64>,
    lookup: AHashMap<IndexPair, usize>,
}

impl PairTable {
    /// Builds a table with every given pair at zero. Duplicate pairs are kept once.
    pub fn with_pairs(pairs: impl IntoIterator<Item = IndexPair>) -> Self {
        let mut table = Self::default();
        for pair in pairs {
            if table.lookup.contains_key(&pair) {
                continue;
            }
            table.lookup.insert(pair.clone(), table.pairs.len());
            table.pairs.push(pair);
            table.counts.push(0);
        }
        table
    }

    /// Number of pairs in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if the table holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if the pair is one of the table's keys.
    #[must_use]
    pub fn contains(&self, pair: &IndexPair) -> bool {
        self.lookup.contains_key(pair)
    }

    /// Returns the count for a pair.
    ///
    /// # Errors
    /// Returns [`DemuxError::MissingPairKey`] if the pair is not a key of the table.
    pub fn get(&self, pair: &IndexPair) -> Result<u64> {
        Ok(self.counts[self.slot(pair)?])
    }

    /// Adds one to the count for a pair.
    ///
    /// # Errors
    /// Returns [`DemuxError::MissingPairKey`] if the pair is not a key of the table.
    pub fn increment(&mut self, pair: &IndexPair) -> Result<()> {
        let slot = self.slot(pair)?;
        self.counts[slot] += 1;
        Ok(())
    }

    /// Subtracts one from the count for a pair.
    ///
    /// # Errors
    /// Returns [`DemuxError::MissingPairKey`] if the pair is not a key of the table, or
    /// [`DemuxError::CounterUnderflow`] if its count is already zero.
    pub fn decrement(&mut self, pair: &IndexPair) -> Result<()> {
        let slot = self.slot(pair)?;
        self.counts[slot] = self.counts[slot].checked_sub(1).ok_or_else(|| {
            DemuxError::CounterUnderflow {
                index1: pair.index1.clone(),
                index2: pair.index2.clone(),
            }
        })?;
        Ok(())
    }

    /// Iterates `(pair, count)` in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (&IndexPair, u64)> {
        self.pairs.iter().zip(self.counts.iter().copied())
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn slot(&self, pair: &IndexPair) -> Result<usize> {
        self.lookup.get(pair).copied().ok_or_else(|| DemuxError::MissingPairKey {
            index1: pair.index1.clone(),
            index2: pair.index2.clone(),
        })
    }
}

/// The set of valid index sequences for a run, in first-appearance order.
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    indexes: Vec<String>,
    members: AHashSet<String>,
}

impl IndexCatalog {
    /// Builds a catalog from index sequences. Duplicates are collapsed, keeping the first.
    pub fn from_indexes<I, S>(indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self { indexes: Vec::new(), members: AHashSet::new() };
        for index in indexes {
            let index = index.into();
            if catalog.members.insert(index.clone()) {
                catalog.indexes.push(index);
            }
        }
        catalog
    }

    /// Reads a catalog from a tab-separated index definition file (plain or gzipped).
    ///
    /// The first line is a header and is ignored. Blank lines are skipped. Every other line
    /// must have at least [`INDEX_COLUMN`] + 1 columns, the index sequence being taken from
    /// column [`INDEX_COLUMN`].
    ///
    /// # Errors
    /// Returns [`DemuxError::MalformedCatalog`] for a short row, an empty index value, or a
    /// file with no index rows, and an I/O error if the file cannot be read.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = Io::default().new_reader(path)?;
        let catalog = Self::from_reader(reader, &path.display().to_string())?;
        info!("Loaded {} index sequences from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Reads a catalog from any buffered reader; `source` names the input in errors.
    ///
    /// # Errors
    /// See [`IndexCatalog::from_path`].
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let malformed = |line: usize, reason: String| DemuxError::MalformedCatalog {
            path: source.to_string(),
            line,
            reason,
        };

        let mut indexes = Vec::new();
        let mut line_count = 0;
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            line_count = n + 1;
            let row = line.trim_end_matches('\r');
            if n == 0 || row.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = row.split('\t').collect();
            if fields.len() <= INDEX_COLUMN {
                return Err(malformed(
                    n + 1,
                    format!(
                        "expected at least {} tab-separated columns, found {}",
                        INDEX_COLUMN + 1,
                        fields.len()
                    ),
                ));
            }

            let index = fields[INDEX_COLUMN].trim();
            if index.is_empty() {
                return Err(malformed(n + 1, format!("column {} is empty", INDEX_COLUMN + 1)));
            }
            if !is_acgt(index) {
                warn!("Index '{index}' on line {} of {source} is not made of A/C/G/T", n + 1);
            }
            indexes.push(index.to_string());
        }

        if indexes.is_empty() {
            return Err(malformed(line_count, "no index sequences found".to_string()));
        }

        let catalog = Self::from_indexes(indexes);
        catalog.check_lengths();
        Ok(catalog)
    }

    /// Number of distinct index sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// True if the catalog holds no indexes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// The index sequences in first-appearance order.
    #[must_use]
    pub fn indexes(&self) -> &[String] {
        &self.indexes
    }

    /// True if `sequence` is a valid index.
    #[must_use]
    pub fn contains(&self, sequence: &str) -> bool {
        self.members.contains(sequence)
    }

    /// A zeroed table with one `(i, i)` pair per index.
    #[must_use]
    pub fn matched_table(&self) -> PairTable {
        PairTable::with_pairs(self.indexes.iter().map(|i| IndexPair::new(i.as_str(), i.as_str())))
    }

    /// A zeroed table with every ordered pair `(i, j)` of distinct indexes.
    #[must_use]
    pub fn swapped_table(&self) -> PairTable {
        PairTable::with_pairs(self.indexes.iter().flat_map(|i| {
            self.indexes
                .iter()
                .filter(move |j| *j != i)
                .map(move |j| IndexPair::new(i.as_str(), j.as_str()))
        }))
    }

    /// Warns when the indexes are not all the same length.
    fn check_lengths(&self) {
        let lengths: AHashSet<usize> = self.indexes.iter().map(String::len).collect();
        if lengths.len() > 1 {
            let mut lengths: Vec<usize> = lengths.into_iter().collect();
            lengths.sort_unstable();
            warn!("Index sequences have differing lengths: {lengths:?}");
        }
    }
}
