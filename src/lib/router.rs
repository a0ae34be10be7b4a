//! Output FASTQ sinks and routing of classified read pairs.
//!
//! Every catalog index gets a forward/reverse pair of files, plus one pair for swapped
//! (`unmatched`) and one for unknown or low quality (`unknown_lowqual`) records, giving
//! `2 * n + 4` open files for `n` indexes. Files are opened in append mode and held for the
//! whole run.

use ahash::AHashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::catalog::IndexCatalog;
use crate::classify::{Assignment, Category, Classification};
use crate::errors::{DemuxError, Result};
use crate::fastq::FastqRecord;

/// File name prefix for index-swapped records.
pub const UNMATCHED_PREFIX: &str = "unmatched";

/// File name prefix for unknown and low quality records.
pub const UNKNOWN_PREFIX: &str = "unknown_lowqual";

/// Selects one pair of output files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SinkKey {
    /// Dual-matched records for one index.
    Index(String),
    /// Index-swapped records.
    Unmatched,
    /// Unknown or low quality records.
    Unknown,
}

impl SinkKey {
    /// Picks the sink for a final classification.
    #[must_use]
    pub fn for_classification(classification: &Classification) -> Self {
        match classification.category {
            Category::Matched => Self::Index(classification.pair.index1.clone()),
            Category::Swapped => Self::Unmatched,
            Category::Unknown => Self::Unknown,
        }
    }

    /// Prefix of this sink's file names.
    #[must_use]
    pub fn file_prefix(&self) -> &str {
        match self {
            Self::Index(index) => index,
            Self::Unmatched => UNMATCHED_PREFIX,
            Self::Unknown => UNKNOWN_PREFIX,
        }
    }

    /// Paths of the forward and reverse files under `dir`.
    #[must_use]
    pub fn paths(&self, dir: &Path) -> (PathBuf, PathBuf) {
        let prefix = self.file_prefix();
        (dir.join(format!("{prefix}_forward.fq")), dir.join(format!("{prefix}_reverse.fq")))
    }
}

impl fmt::Display for SinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}

/// Forward and reverse writers for one sink.
#[derive(Debug)]
pub struct SinkPair {
    forward: BufWriter<File>,
    reverse: BufWriter<File>,
}

impl SinkPair {
    fn open(forward: &Path, reverse: &Path) -> Result<Self> {
        Ok(Self { forward: open_append(forward)?, reverse: open_append(reverse)? })
    }

    fn write_pair(&mut self, read1: &FastqRecord, read2: &FastqRecord) -> Result<()> {
        read1.write_to(&mut self.forward)?;
        read2.write_to(&mut self.reverse)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.forward.flush()?;
        self.reverse.flush()?;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<BufWriter<File>> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(BufWriter::new)
        .map_err(|source| DemuxError::OutputOpen { path: path.display().to_string(), source })
}

/// All output sinks of a run.
///
/// Dropping the sinks closes every file; [`OutputSinks::finish`] additionally surfaces flush
/// errors.
#[derive(Debug)]
pub struct OutputSinks {
    sinks: AHashMap<SinkKey, SinkPair>,
}

impl OutputSinks {
    /// Opens the sinks for every index in `catalog` plus `unmatched` and `unknown_lowqual`
    /// under `dir`, which must exist.
    ///
    /// # Errors
    /// Returns [`DemuxError::OutputOpen`] for the first file that cannot be opened. Files opened
    /// before the failure are closed.
    pub fn open(dir: &Path, catalog: &IndexCatalog) -> Result<Self> {
        let keys = catalog
            .indexes()
            .iter()
            .map(|index| SinkKey::Index(index.clone()))
            .chain([SinkKey::Unmatched, SinkKey::Unknown]);

        let mut sinks = AHashMap::with_capacity(catalog.len() + 2);
        for key in keys {
            let (forward, reverse) = key.paths(dir);
            let pair = SinkPair::open(&forward, &reverse)?;
            sinks.insert(key, pair);
        }
        Ok(Self { sinks })
    }

    /// Number of open files.
    #[must_use]
    pub fn stream_count(&self) -> usize {
        self.sinks.len() * 2
    }

    /// Annotates both reads' headers with the resolved index pair and appends them to the sink
    /// selected by the final classification.
    ///
    /// # Errors
    /// Returns [`DemuxError::UnresolvedAssignment`] for a provisional assignment,
    /// [`DemuxError::MissingSink`] if no sink exists for the selected key, or any write error.
    pub fn route(
        &mut self,
        assignment: &Assignment,
        mut read1: FastqRecord,
        mut read2: FastqRecord,
    ) -> Result<()> {
        let Assignment::Final(classification) = assignment else {
            let pair = assignment.classification().pair.to_string();
            return Err(DemuxError::UnresolvedAssignment { pair });
        };
        let tag = classification.pair.to_string();
        read1.annotate(&tag);
        read2.annotate(&tag);

        let key = SinkKey::for_classification(classification);
        let sink = self
            .sinks
            .get_mut(&key)
            .ok_or_else(|| DemuxError::MissingSink { key: key.to_string() })?;
        sink.write_pair(&read1, &read2)
    }

    /// Flushes and closes every file.
    ///
    /// # Errors
    /// Returns the first flush error.
    pub fn finish(mut self) -> Result<()> {
        for sink in self.sinks.values_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> IndexCatalog {
        IndexCatalog::from_indexes(["AAAA", "CCCC"])
    }

    fn read(name: &str, bases: &str) -> FastqRecord {
        FastqRecord::new(format!("@{name}"), bases, "+", "I".repeat(bases.len()))
    }

    fn final_assignment(index1: &str, index2: &str, catalog: &IndexCatalog) -> Assignment {
        Assignment::Final(classify(index1, index2, catalog))
    }

    fn contents(dir: &TempDir, name: &str) -> String {
        fs::read_to_string(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_open_creates_all_files() {
        let dir = TempDir::new().unwrap();
        let sinks = OutputSinks::open(dir.path(), &catalog()).unwrap();
        assert_eq!(sinks.stream_count(), 2 * 2 + 4);
        sinks.finish().unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                "AAAA_forward.fq",
                "AAAA_reverse.fq",
                "CCCC_forward.fq",
                "CCCC_reverse.fq",
                "unknown_lowqual_forward.fq",
                "unknown_lowqual_reverse.fq",
                "unmatched_forward.fq",
                "unmatched_reverse.fq",
            ]
        );
    }

    #[test]
    fn test_route_by_category() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog();
        let mut sinks = OutputSinks::open(dir.path(), &catalog).unwrap();

        let clusters = [("m", "CCCC", "GGGG"), ("s", "AAAA", "GGGG"), ("u", "ACGT", "NNNN")];
        for (name, index1, index2) in clusters {
            let assignment = final_assignment(index1, index2, &catalog);
            sinks.route(&assignment, read(name, "AC"), read(name, "GT")).unwrap();
        }
        sinks.finish().unwrap();

        assert_eq!(contents(&dir, "CCCC_forward.fq"), "@m_CCCC-CCCC\nAC\n+\nII\n");
        assert_eq!(contents(&dir, "CCCC_reverse.fq"), "@m_CCCC-CCCC\nGT\n+\nII\n");
        assert_eq!(contents(&dir, "AAAA_forward.fq"), "");
        assert_eq!(contents(&dir, "unmatched_forward.fq"), "@s_AAAA-CCCC\nAC\n+\nII\n");
        assert_eq!(contents(&dir, "unmatched_reverse.fq"), "@s_AAAA-CCCC\nGT\n+\nII\n");
        assert_eq!(contents(&dir, "unknown_lowqual_forward.fq"), "@u_ACGT-NNNN\nAC\n+\nII\n");
        assert_eq!(contents(&dir, "unknown_lowqual_reverse.fq"), "@u_ACGT-NNNN\nGT\n+\nII\n");
    }

    #[test]
    fn test_demoted_record_goes_to_unknown() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog();
        let mut sinks = OutputSinks::open(dir.path(), &catalog).unwrap();
        let demoted = Assignment::Final(classify("AAAA", "TTTT", &catalog).demote());
        sinks.route(&demoted, read("d", "A"), read("d", "T")).unwrap();
        sinks.finish().unwrap();

        assert_eq!(contents(&dir, "AAAA_forward.fq"), "");
        assert_eq!(contents(&dir, "unknown_lowqual_forward.fq"), "@d_AAAA-AAAA\nA\n+\nI\n");
    }

    #[test]
    fn test_files_are_appended() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("unmatched_forward.fq"), "existing\n").unwrap();
        let catalog = catalog();
        let mut sinks = OutputSinks::open(dir.path(), &catalog).unwrap();
        let swapped = final_assignment("AAAA", "GGGG", &catalog);
        sinks.route(&swapped, read("s", "A"), read("s", "T")).unwrap();
        sinks.finish().unwrap();

        assert_eq!(contents(&dir, "unmatched_forward.fq"), "existing\n@s_AAAA-CCCC\nA\n+\nI\n");
    }

    #[test]
    fn test_provisional_assignment_is_not_written() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog();
        let mut sinks = OutputSinks::open(dir.path(), &catalog).unwrap();
        let provisional = Assignment::Provisional(classify("CCCC", "GGGG", &catalog));
        let err = sinks.route(&provisional, read("p", "A"), read("p", "T")).unwrap_err();
        assert!(
            matches!(err, DemuxError::UnresolvedAssignment { ref pair } if pair == "CCCC-CCCC")
        );
        sinks.finish().unwrap();

        assert_eq!(contents(&dir, "CCCC_forward.fq"), "");
        assert_eq!(contents(&dir, "CCCC_reverse.fq"), "");
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does").join("not").join("exist");
        let err = OutputSinks::open(&missing, &catalog()).unwrap_err();
        assert!(matches!(err, DemuxError::OutputOpen { .. }));
    }

    #[test]
    fn test_sink_key_paths() {
        let dir = Path::new("/out");
        assert_eq!(
            SinkKey::Index("ACGT".to_string()).paths(dir),
            (PathBuf::from("/out/ACGT_forward.fq"), PathBuf::from("/out/ACGT_reverse.fq"))
        );
        assert_eq!(SinkKey::Unknown.to_string(), "unknown_lowqual");
        assert_eq!(SinkKey::Unmatched.to_string(), "unmatched");
    }
}
