//! End-of-run report: plain text summary plus per-pair metric rows.

use fgoxide::io::Io;
use std::io::Write;
use std::path::Path;

use fqdemux_metrics::{
    IndexPairMetric, PairCategory, format_count, format_percent, rounded_percent,
};

use crate::catalog::PairTable;
use crate::errors::Result;
use crate::stats::{DemuxCounts, DemuxStats};

/// Name of the text report written to the output directory.
pub const REPORT_FILE_NAME: &str = "index_report.txt";

/// Decimal places for category percentages.
pub const SUMMARY_DECIMALS: u32 = 2;

/// Decimal places for per-pair percentages.
pub const PAIR_DECIMALS: u32 = 3;

/// Final totals and pair tables of a run.
#[derive(Debug, Clone)]
pub struct DemuxReport {
    counts: DemuxCounts,
    matched: PairTable,
    swapped: PairTable,
}

impl DemuxReport {
    #[must_use]
    pub fn new(counts: DemuxCounts, matched: PairTable, swapped: PairTable) -> Self {
        Self { counts, matched, swapped }
    }

    #[must_use]
    pub fn counts(&self) -> &DemuxCounts {
        &self.counts
    }

    #[must_use]
    pub fn matched(&self) -> &PairTable {
        &self.matched
    }

    #[must_use]
    pub fn swapped(&self) -> &PairTable {
        &self.swapped
    }

    /// Percentage of all records with a `%` suffix, or `NA` for an empty run.
    fn percent(&self, count: u64, decimals: u32) -> String {
        match rounded_percent(count, self.counts.total, decimals) {
            Some(pct) => format!("{}%", format_percent(Some(pct), decimals)),
            None => format_percent(None, decimals),
        }
    }

    /// Writes the text report.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let c = &self.counts;
        writeln!(out, "Demultiplexing Report")?;
        writeln!(out)?;
        if c.total == 0 {
            writeln!(out, "No records processed")?;
            writeln!(out)?;
        }
        writeln!(out, "Total records\t{}", format_count(c.total))?;
        for (label, count) in [
            ("Dual matched records", c.matched),
            ("Index swapped records", c.swapped),
            ("Unknown or low quality records", c.unknown),
        ] {
            writeln!(
                out,
                "{label}\t{}\t{}",
                format_count(count),
                self.percent(count, SUMMARY_DECIMALS)
            )?;
        }

        for (title, table) in [
            ("Summary of Dual Matched Indexes", &self.matched),
            ("Summary of Swapped Indexes", &self.swapped),
        ] {
            writeln!(out)?;
            writeln!(out, "{title}")?;
            writeln!(out, "Index pair\tCount\tPercent of total")?;
            for (pair, count) in table.iter() {
                writeln!(out, "{pair}\t{count}\t{}", self.percent(count, PAIR_DECIMALS))?;
            }
        }
        Ok(())
    }

    /// Renders the text report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Writes the text report to `path`.
    pub fn write_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Io::default().new_writer(path)?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// One metric row per matched pair followed by one per swapped pair, in table order.
    #[must_use]
    pub fn metrics(&self) -> Vec<IndexPairMetric> {
        let total = self.counts.total;
        let rows = |category: PairCategory, table: &PairTable| {
            table
                .iter()
                .map(|(pair, count)| IndexPairMetric {
                    category,
                    index1: pair.index1.clone(),
                    index2: pair.index2.clone(),
                    count,
                    percent: rounded_percent(count, total, PAIR_DECIMALS),
                })
                .collect::<Vec<_>>()
        };
        let mut metrics = rows(PairCategory::Matched, &self.matched);
        metrics.extend(rows(PairCategory::Swapped, &self.swapped));
        metrics
    }
}

impl From<DemuxStats> for DemuxReport {
    fn from(stats: DemuxStats) -> Self {
        Self::new(stats.counts(), stats.matched().clone(), stats.swapped().clone())
    }
}
