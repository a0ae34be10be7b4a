//! Custom error types for fqdemux operations.

use thiserror::Error;

/// Result type alias for fqdemux operations
pub type Result<T> = std::result::Result<T, DemuxError>;

/// Error type for fqdemux operations
#[derive(Error, Debug)]
pub enum DemuxError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Invalid quality threshold
    #[error("Invalid quality threshold: {value} (must be between 0 and {max})")]
    InvalidQuality {
        /// The invalid quality value
        value: u8,
        /// Maximum valid value
        max: u8,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "FASTQ", "index")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A row of the index definition file does not have the expected shape
    #[error("Malformed index file '{path}' at line {line}: {reason}")]
    MalformedCatalog {
        /// Path to the index file
        path: String,
        /// 1-based line number of the offending row
        line: usize,
        /// Explanation of the problem
        reason: String,
    },

    /// One or more input FASTQs ran out of records before the others
    #[error(
        "Input FASTQs are out of sync at record {record}: {} ended while {} still had records",
        .exhausted.join(", "),
        .remaining.join(", ")
    )]
    StreamDesync {
        /// 1-based number of the record that could not be read from every input
        record: u64,
        /// Inputs that had no more records
        exhausted: Vec<String>,
        /// Inputs that still had a record
        remaining: Vec<String>,
    },

    /// An input FASTQ ended part-way through a record
    #[error("Truncated FASTQ record {record} in {stream}: expected 4 lines, found {lines}")]
    TruncatedRecord {
        /// The input the record was read from
        stream: String,
        /// 1-based record number
        record: u64,
        /// Number of lines present before end of file
        lines: usize,
    },

    /// A pair-table lookup for a key that was not created with the table
    #[error("Index pair {index1}-{index2} is not present in the pair table")]
    MissingPairKey {
        /// Index 1 sequence of the pair
        index1: String,
        /// Index 2 sequence of the pair
        index2: String,
    },

    /// A pair-table counter would go below zero
    #[error("Count for index pair {index1}-{index2} cannot be decremented below zero")]
    CounterUnderflow {
        /// Index 1 sequence of the pair
        index1: String,
        /// Index 2 sequence of the pair
        index2: String,
    },

    /// No output sink is registered for a routing key
    #[error("No output files are open for '{key}'")]
    MissingSink {
        /// The routing key
        key: String,
    },

    /// A record was routed before its quality check completed
    #[error("Record for index pair {pair} was routed before its quality check")]
    UnresolvedAssignment {
        /// The record's resolved index pair
        pair: String,
    },

    /// An output file could not be opened
    #[error("Failed to open output file '{path}': {source}")]
    OutputOpen {
        /// Path to the output file
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Underlying I/O failure while reading or writing records
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure opening a file through fgoxide
    #[error(transparent)]
    Fg(#[from] fgoxide::FgError),
}
