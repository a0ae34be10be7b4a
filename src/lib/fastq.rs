//! Synchronized reading of the four FASTQ streams of a dual-indexed paired-end run.
//!
//! A run produces four files with one record per cluster each: index 1, index 2, read 1 and
//! read 2. [`QuadReader`] advances all four in lockstep, four lines at a time, and yields one
//! [`ReadQuad`] per cluster. The streams must hold the same number of records; a stream that
//! runs out early is reported as [`DemuxError::StreamDesync`] rather than silently dropping the
//! tail of the others.

use fgoxide::io::Io;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::errors::{DemuxError, Result};

/// Number of lines in one FASTQ record.
pub const LINES_PER_RECORD: usize = 4;

/// The four input streams, in the order [`QuadReader`] reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadStream {
    /// First index read (i7).
    Index1,
    /// Second index read (i5).
    Index2,
    /// First biological read.
    Read1,
    /// Second biological read.
    Read2,
}

impl ReadStream {
    /// All streams in reading order.
    pub const ALL: [ReadStream; 4] =
        [ReadStream::Index1, ReadStream::Index2, ReadStream::Read1, ReadStream::Read2];
}

impl fmt::Display for ReadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index1 => write!(f, "index 1"),
            Self::Index2 => write!(f, "index 2"),
            Self::Read1 => write!(f, "read 1"),
            Self::Read2 => write!(f, "read 2"),
        }
    }
}

/// One FASTQ record as its four raw lines, without line terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastqRecord {
    /// Header line, including the leading `@`.
    pub header: String,
    /// Bases.
    pub sequence: String,
    /// Separator line, including the leading `+`.
    pub separator: String,
    /// Phred+33 quality string.
    pub quality: String,
}

impl FastqRecord {
    /// Creates a record from its four lines.
    pub fn new(
        header: impl Into<String>,
        sequence: impl Into<String>,
        separator: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
            separator: separator.into(),
            quality: quality.into(),
        }
    }

    /// Appends `_<tag>` to the header line.
    pub fn annotate(&mut self, tag: &str) {
        self.header.push('_');
        self.header.push_str(tag);
    }

    /// Writes the four lines, each followed by a newline.
    ///
    /// # Errors
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for line in [&self.header, &self.sequence, &self.separator, &self.quality] {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// The four records for one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadQuad {
    /// Index 1 record.
    pub index1: FastqRecord,
    /// Index 2 record, as sequenced (not reverse complemented).
    pub index2: FastqRecord,
    /// Biological read 1.
    pub read1: FastqRecord,
    /// Biological read 2.
    pub read2: FastqRecord,
}

/// Outcome of trying to read one record from one stream.
enum RecordRead {
    Complete(FastqRecord),
    Exhausted,
    Truncated(usize),
}

/// Reads index 1, index 2, read 1 and read 2 FASTQs in lockstep.
///
/// Iterating yields `Result<ReadQuad>`. After the first error the iterator is fused and returns
/// `None`.
pub struct QuadReader<R: BufRead> {
    readers: [R; 4],
    sources: [String; 4],
    records_read: u64,
    done: bool,
}

impl<R: BufRead> QuadReader<R> {
    /// Wraps four readers, given in the order index 1, index 2, read 1, read 2.
    pub fn new(readers: [R; 4]) -> Self {
        Self::with_sources(readers, ReadStream::ALL.map(|s| s.to_string()))
    }

    /// Wraps four readers with names used in error messages.
    pub fn with_sources(readers: [R; 4], sources: [String; 4]) -> Self {
        Self { readers, sources, records_read: 0, done: false }
    }

    /// Number of complete quads read so far.
    #[must_use]
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn read_quad(&mut self) -> Result<Option<ReadQuad>> {
        let record_number = self.records_read + 1;
        let mut slots: [Option<FastqRecord>; 4] = Default::default();

        for (i, reader) in self.readers.iter_mut().enumerate() {
            match read_record(reader)? {
                RecordRead::Complete(record) => {
                    validate_record(&record, &self.sources[i], record_number)?;
                    slots[i] = Some(record);
                }
                RecordRead::Exhausted => {}
                RecordRead::Truncated(lines) => {
                    return Err(DemuxError::TruncatedRecord {
                        stream: self.sources[i].clone(),
                        record: record_number,
                        lines,
                    });
                }
            }
        }

        if slots.iter().all(Option::is_none) {
            return Ok(None);
        }

        match slots {
            [Some(index1), Some(index2), Some(read1), Some(read2)] => {
                self.records_read = record_number;
                Ok(Some(ReadQuad { index1, index2, read1, read2 }))
            }
            slots => {
                let (remaining, exhausted): (Vec<_>, Vec<_>) =
                    self.sources.iter().zip(slots.iter()).partition(|(_, slot)| slot.is_some());
                Err(DemuxError::StreamDesync {
                    record: record_number,
                    exhausted: exhausted.into_iter().map(|(s, _)| s.clone()).collect(),
                    remaining: remaining.into_iter().map(|(s, _)| s.clone()).collect(),
                })
            }
        }
    }
}

impl QuadReader<Box<dyn BufRead + Send>> {
    /// Opens the four FASTQs; gzipped inputs are detected from a `.gz`/`.bgz` extension.
    ///
    /// # Errors
    /// Returns an error if any file cannot be opened.
    pub fn from_paths<P: AsRef<Path>>(
        index1: P,
        index2: P,
        read1: P,
        read2: P,
    ) -> Result<Self> {
        let io = Io::default();
        let paths = [index1, index2, read1, read2];
        let sources = [0, 1, 2, 3]
            .map(|i| format!("{} FASTQ '{}'", ReadStream::ALL[i], paths[i].as_ref().display()));
        let [p1, p2, p3, p4] = paths;
        let readers = [
            io.new_reader(p1.as_ref())?,
            io.new_reader(p2.as_ref())?,
            io.new_reader(p3.as_ref())?,
            io.new_reader(p4.as_ref())?,
        ];
        Ok(Self::with_sources(readers, sources))
    }
}

impl<R: BufRead> Iterator for QuadReader<R> {
    type Item = Result<ReadQuad>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_quad() {
            Ok(Some(quad)) => Some(Ok(quad)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Reads up to four lines from `reader`, stripping line terminators.
fn read_record<R: BufRead>(reader: &mut R) -> Result<RecordRead> {
    let mut lines: [String; LINES_PER_RECORD] = Default::default();
    for (n, line) in lines.iter_mut().enumerate() {
        if reader.read_line(line)? == 0 {
            return Ok(if n == 0 { RecordRead::Exhausted } else { RecordRead::Truncated(n) });
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
    }
    let [header, sequence, separator, quality] = lines;
    Ok(RecordRead::Complete(FastqRecord { header, sequence, separator, quality }))
}

fn validate_record(record: &FastqRecord, source: &str, record_number: u64) -> Result<()> {
    let problem = if !record.header.starts_with('@') {
        "header line does not start with '@'"
    } else if !record.separator.starts_with('+') {
        "separator line does not start with '+'"
    } else {
        return Ok(());
    };
    Err(DemuxError::InvalidFileFormat {
        file_type: "FASTQ".to_string(),
        path: source.to_string(),
        reason: format!("record {record_number}: {problem}"),
    })
}
