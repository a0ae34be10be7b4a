//! Demultiplex a dual-indexed paired-end run into per-sample FASTQs.

use anyhow::{Context, Result, bail};
use clap::Parser;
use fqdemux_lib::catalog::IndexCatalog;
use fqdemux_lib::demux::{DemuxOptions, Demultiplexer};
use fqdemux_lib::fastq::QuadReader;
use fqdemux_lib::logging::{OperationTimer, log_demux_summary};
use fqdemux_lib::quality::{DEFAULT_CUTOFF, QualityMethod};
use fqdemux_lib::report::REPORT_FILE_NAME;
use fqdemux_lib::validation::{validate_files_exist, validate_output_dir, validate_quality_score};
use fqdemux_metrics::write_metrics_auto;
use log::info;
use std::path::PathBuf;

use crate::commands::command::Command;

/// Demultiplex dual-indexed paired-end FASTQs.
#[derive(Debug, Parser)]
#[command(
    name = "demux",
    about = "\x1b[38;5;30m[DEMULTIPLEXING]\x1b[0m \x1b[36mSplit paired-end FASTQs by dual index\x1b[0m",
    long_about = r#"
Demultiplex a dual-indexed, paired-end sequencing run.

Four FASTQs with the same number of records are read in lockstep: the index 1 and index 2
reads and the two biological reads. Index 2 is reverse complemented and the pair is looked up
in the index file (tab-separated with a header; the index sequence is in the fifth column).

  * Both indexes known and equal: the read pair is written to <INDEX>_forward.fq and
    <INDEX>_reverse.fq.
  * Both indexes known but different (index hopping): unmatched_forward.fq and
    unmatched_reverse.fq.
  * Either index unknown, or either index read below the quality cutoff:
    unknown_lowqual_forward.fq and unknown_lowqual_reverse.fq.

Read headers are suffixed with "_<INDEX1>-<RC(INDEX2)>". Output files are appended to if they
already exist. A summary is written to index_report.txt in the output directory.

Inputs may be gzip compressed (detected by the .gz extension).

Example usage:
  fqdemux demux -1 I1.fq.gz -2 I2.fq.gz -r R1.fq.gz -R R2.fq.gz -x indexes.tsv -m mean -o out
"#
)]
pub struct Demux {
    /// Index 1 (i7) FASTQ
    #[arg(short = '1', long = "index1")]
    pub index1: PathBuf,

    /// Index 2 (i5) FASTQ, as sequenced
    #[arg(short = '2', long = "index2")]
    pub index2: PathBuf,

    /// Read 1 FASTQ
    #[arg(short = 'r', long = "read1")]
    pub read1: PathBuf,

    /// Read 2 FASTQ
    #[arg(short = 'R', long = "read2")]
    pub read2: PathBuf,

    /// Tab-separated index file with a header row; index sequences in the fifth column
    #[arg(short = 'x', long = "index-file")]
    pub index_file: PathBuf,

    /// Minimum Phred score for index reads (0-93)
    #[arg(short = 'q', long = "quality-cutoff", default_value_t = DEFAULT_CUTOFF)]
    pub quality_cutoff: u8,

    /// How index read qualities are compared to the cutoff
    #[arg(short = 'm', long = "method", value_enum)]
    pub method: QualityMethod,

    /// Output directory, created if it does not exist
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Optional path for a tab-separated file of per-index-pair metrics
    #[arg(short = 'M', long = "metrics")]
    pub metrics: Option<PathBuf>,
}

impl Demux {
    /// Checks inputs and option values, collecting every problem into one error.
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Err(e) = validate_files_exist(&[
            (&self.index1, "Index 1 FASTQ"),
            (&self.index2, "Index 2 FASTQ"),
            (&self.read1, "Read 1 FASTQ"),
            (&self.read2, "Read 2 FASTQ"),
            (&self.index_file, "Index file"),
        ]) {
            errors.push(e.to_string());
        }
        if let Err(e) = validate_quality_score(self.quality_cutoff) {
            errors.push(e.to_string());
        }
        if let Err(e) = validate_output_dir(&self.output, "output") {
            errors.push(e.to_string());
        }

        if !errors.is_empty() {
            bail!("Invalid arguments:\n  {}", errors.join("\n  "));
        }
        Ok(())
    }
}

impl Command for Demux {
    fn execute(&self, _command_line: &str) -> Result<()> {
        self.validate()?;

        info!("Index 1: {}", self.index1.display());
        info!("Index 2: {}", self.index2.display());
        info!("Read 1: {}", self.read1.display());
        info!("Read 2: {}", self.read2.display());
        info!("Quality: {} >= {}", self.method, self.quality_cutoff);

        let catalog = IndexCatalog::from_path(&self.index_file)
            .with_context(|| format!("Failed to load index file {}", self.index_file.display()))?;

        if !self.output.exists() {
            info!("Output directory {} didn't exist, creating it.", self.output.display());
            std::fs::create_dir_all(&self.output).with_context(|| {
                format!("Failed to create output directory {}", self.output.display())
            })?;
        }

        let reader =
            QuadReader::from_paths(&self.index1, &self.index2, &self.read1, &self.read2)
                .context("Failed to open input FASTQs")?;
        let options = DemuxOptions::new(&self.output, self.method, self.quality_cutoff);
        let mut demux = Demultiplexer::new(catalog, &options)?;

        let timer = OperationTimer::new("Demultiplexing reads");
        let processed = demux.run(reader)?;
        let report = demux.finish()?;
        timer.log_completion(processed);

        let report_path = self.output.join(REPORT_FILE_NAME);
        report
            .write_text(&report_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        info!("Wrote report to {}", report_path.display());

        if let Some(path) = &self.metrics {
            write_metrics_auto(path, &report.metrics())?;
            info!("Wrote index pair metrics to {}", path.display());
        }

        log_demux_summary(report.counts());
        Ok(())
    }
}
