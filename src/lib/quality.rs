//! Quality gate applied to index reads of recognised index pairs.
//!
//! Quality strings are Phred+33 encoded. Two policies are available, selected once per run:
//! [`QualityMethod::Mean`] passes a read whose mean score reaches the cutoff, while
//! [`QualityMethod::PerBase`] requires every individual score to reach it.

use clap::ValueEnum;
use std::fmt;

use crate::errors::{DemuxError, Result};

/// ASCII offset of Phred+33 quality encoding.
pub const PHRED_OFFSET: u8 = 33;

/// Highest Phred score representable in printable Phred+33 (`~`).
pub const MAX_PHRED: u8 = 93;

/// Default quality cutoff.
pub const DEFAULT_CUTOFF: u8 = 30;

/// How an index read's quality string is compared to the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QualityMethod {
    /// Mean Phred score of the read must be at least the cutoff.
    #[value(alias = "avg")]
    Mean,
    /// Every base's Phred score must be at least the cutoff.
    #[value(name = "per-base", aliases = ["per_base", "ind"])]
    PerBase,
}

impl fmt::Display for QualityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::PerBase => write!(f, "per-base"),
        }
    }
}

/// Converts one Phred+33 quality character to its score. Characters below `!` score negative.
#[inline]
#[must_use]
pub fn phred_score(qual: u8) -> i16 {
    i16::from(qual) - i16::from(PHRED_OFFSET)
}

/// A quality policy with its cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityGate {
    method: QualityMethod,
    cutoff: u8,
}

impl QualityGate {
    /// Creates a gate.
    ///
    /// # Errors
    /// Returns [`DemuxError::InvalidQuality`] if `cutoff` exceeds [`MAX_PHRED`].
    pub fn new(method: QualityMethod, cutoff: u8) -> Result<Self> {
        if cutoff > MAX_PHRED {
            return Err(DemuxError::InvalidQuality { value: cutoff, max: MAX_PHRED });
        }
        Ok(Self { method, cutoff })
    }

    /// True if a single quality string passes. An empty string never passes.
    #[must_use]
    pub fn passes(&self, quals: &[u8]) -> bool {
        if quals.is_empty() {
            return false;
        }
        match self.method {
            // sum / len >= cutoff, compared in integers
            QualityMethod::Mean => {
                let sum: i64 = quals.iter().map(|&q| i64::from(phred_score(q))).sum();
                sum >= i64::from(self.cutoff) * quals.len() as i64
            }
            QualityMethod::PerBase => {
                quals.iter().all(|&q| phred_score(q) >= i16::from(self.cutoff))
            }
        }
    }

    /// True if both index quality strings pass.
    #[must_use]
    pub fn passes_pair(&self, index1_quals: &[u8], index2_quals: &[u8]) -> bool {
        self.passes(index1_quals) && self.passes(index2_quals)
    }
}
