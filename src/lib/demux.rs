//! The per-record demultiplexing loop.
//!
//! Each [`ReadQuad`] is classified from its two index reads. A matched or swapped record is
//! counted provisionally, then both index quality strings are run through the
//! [`QualityGate`]; failing records are demoted to unknown and the counts corrected. The read
//! pair is then written to the sink for its final category.

use std::io::BufRead;
use std::path::PathBuf;

use crate::catalog::IndexCatalog;
use crate::classify::{Assignment, Category, Classification, classify};
use crate::errors::Result;
use crate::fastq::{QuadReader, ReadQuad};
use crate::progress::{DEFAULT_INTERVAL, ProgressTracker};
use crate::quality::{QualityGate, QualityMethod};
use crate::report::DemuxReport;
use crate::router::OutputSinks;
use crate::stats::DemuxStats;

/// Options for one demultiplexing run.
#[derive(Debug, Clone)]
pub struct DemuxOptions {
    /// Directory receiving the output FASTQs. Must exist.
    pub output_dir: PathBuf,
    pub method: QualityMethod,
    pub quality_cutoff: u8,
    /// Records between progress log messages.
    pub progress_interval: u64,
}

impl DemuxOptions {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, method: QualityMethod, quality_cutoff: u8) -> Self {
        Self {
            output_dir: output_dir.into(),
            method,
            quality_cutoff,
            progress_interval: DEFAULT_INTERVAL,
        }
    }
}

/// Applies the quality gate to a provisional assignment, demoting it if either index read
/// fails, and returns it as final. Unknown records pass through ungated.
fn finalize(
    assignment: Assignment,
    quad: &ReadQuad,
    gate: &QualityGate,
    stats: &mut DemuxStats,
) -> Result<Assignment> {
    let classification = match assignment {
        Assignment::Final(_) => return Ok(assignment),
        Assignment::Provisional(c) if c.category == Category::Unknown => {
            return Ok(Assignment::Final(c));
        }
        Assignment::Provisional(c) => c,
    };
    if gate.passes_pair(quad.index1.quality.as_bytes(), quad.index2.quality.as_bytes()) {
        Ok(Assignment::Final(classification))
    } else {
        stats.demote(&classification)?;
        Ok(Assignment::Final(classification.demote()))
    }
}

/// Drives classification, gating, counting and routing for one run.
pub struct Demultiplexer {
    catalog: IndexCatalog,
    gate: QualityGate,
    stats: DemuxStats,
    sinks: OutputSinks,
    progress_interval: u64,
}

impl Demultiplexer {
    /// Opens all output sinks under `options.output_dir`.
    ///
    /// # Errors
    /// Returns an error if the quality cutoff is out of range or any output file cannot be
    /// opened.
    pub fn new(catalog: IndexCatalog, options: &DemuxOptions) -> Result<Self> {
        let gate = QualityGate::new(options.method, options.quality_cutoff)?;
        let sinks = OutputSinks::open(&options.output_dir, &catalog)?;
        log::info!(
            "Opened {} output files in {}",
            sinks.stream_count(),
            options.output_dir.display()
        );
        let stats = DemuxStats::new(&catalog);
        Ok(Self { catalog, gate, stats, sinks, progress_interval: options.progress_interval })
    }

    /// Classifies, gates, counts and writes one record, returning its final classification.
    pub fn process(&mut self, quad: ReadQuad) -> Result<Classification> {
        let classification =
            classify(&quad.index1.sequence, &quad.index2.sequence, &self.catalog);
        self.stats.record(&classification)?;

        let provisional = Assignment::Provisional(classification);
        let assignment = finalize(provisional, &quad, &self.gate, &mut self.stats)?;

        let ReadQuad { read1, read2, .. } = quad;
        self.sinks.route(&assignment, read1, read2)?;
        Ok(assignment.into_classification())
    }

    /// Processes every record from `reader`. Stops at the first error.
    pub fn run<R: BufRead>(&mut self, reader: QuadReader<R>) -> Result<u64> {
        let mut progress =
            ProgressTracker::new("Processed read quads").with_interval(self.progress_interval);
        for quad in reader {
            self.process(quad?)?;
            progress.add(1);
        }
        progress.log_final();
        Ok(progress.count())
    }

    #[must_use]
    pub fn stats(&self) -> &DemuxStats {
        &self.stats
    }

    /// Flushes and closes the sinks and returns the final report.
    pub fn finish(self) -> Result<DemuxReport> {
        self.sinks.finish()?;
        Ok(DemuxReport::from(self.stats))
    }
}
