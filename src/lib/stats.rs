//! Run counters and per-pair tallies, with correction for demoted records.

use crate::catalog::{IndexCatalog, PairTable};
use crate::classify::{Category, Classification};
use crate::errors::{DemuxError, Result};

/// Category totals for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemuxCounts {
    pub total: u64,
    pub matched: u64,
    pub swapped: u64,
    pub unknown: u64,
}

/// Totals plus the matched and swapped pair tables.
///
/// Matched and swapped records are counted as soon as they are classified. If the record then
/// fails the quality gate, [`DemuxStats::demote`] takes the count back off the pair table and
/// category total and adds it to `unknown`.
#[derive(Debug, Clone)]
pub struct DemuxStats {
    counts: DemuxCounts,
    matched: PairTable,
    swapped: PairTable,
}

impl DemuxStats {
    /// Creates zeroed statistics with tables covering every pair of `catalog`.
    #[must_use]
    pub fn new(catalog: &IndexCatalog) -> Self {
        Self {
            counts: DemuxCounts::default(),
            matched: catalog.matched_table(),
            swapped: catalog.swapped_table(),
        }
    }

    /// Counts a freshly classified record.
    pub fn record(&mut self, classification: &Classification) -> Result<()> {
        match classification.category {
            Category::Matched => {
                self.matched.increment(&classification.pair)?;
                self.counts.matched += 1;
            }
            Category::Swapped => {
                self.swapped.increment(&classification.pair)?;
                self.counts.swapped += 1;
            }
            Category::Unknown => self.counts.unknown += 1,
        }
        self.counts.total += 1;
        Ok(())
    }

    /// Moves a previously recorded matched or swapped record to unknown.
    ///
    /// Demoting an unknown record is a no-op.
    pub fn demote(&mut self, classification: &Classification) -> Result<()> {
        let (table, total) = match classification.category {
            Category::Matched => (&mut self.matched, &mut self.counts.matched),
            Category::Swapped => (&mut self.swapped, &mut self.counts.swapped),
            Category::Unknown => return Ok(()),
        };
        table.decrement(&classification.pair)?;
        *total = total.checked_sub(1).ok_or_else(|| DemuxError::CounterUnderflow {
            index1: classification.pair.index1.clone(),
            index2: classification.pair.index2.clone(),
        })?;
        self.counts.unknown += 1;
        Ok(())
    }

    #[must_use]
    pub fn counts(&self) -> DemuxCounts {
        self.counts
    }

    #[must_use]
    pub fn matched(&self) -> &PairTable {
        &self.matched
    }

    #[must_use]
    pub fn swapped(&self) -> &PairTable {
        &self.swapped
    }

    /// True if the tables, unknown count and total agree.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let c = self.counts;
        self.matched.total() == c.matched
            && self.swapped.total() == c.swapped
            && c.matched + c.swapped + c.unknown == c.total
    }
}
