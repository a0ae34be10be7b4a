//! Per-index-pair demultiplexing metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Metric;

/// The table an index pair is reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCategory {
    /// Both index reads agree and are known indexes.
    #[default]
    Matched,
    /// Both index reads are known indexes but disagree.
    Swapped,
}

impl fmt::Display for PairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Swapped => write!(f, "swapped"),
        }
    }
}

/// Occurrences of one directed index pair over a run.
///
/// One row is produced for every `(i, i)` pair and every ordered `(i, j)` pair of distinct
/// known indexes, including those that were never observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexPairMetric {
    /// Which table the pair belongs to.
    pub category: PairCategory,
    /// The index 1 sequence.
    pub index1: String,
    /// The reverse-complemented index 2 sequence.
    pub index2: String,
    /// Number of quality-passing records observed with this pair.
    pub count: u64,
    /// `count` as a percentage of all records, rounded to three places. Empty when no
    /// records were processed.
    pub percent: Option<f64>,
}

impl Metric for IndexPairMetric {
    fn metric_name() -> &'static str {
        "index pair"
    }
}
