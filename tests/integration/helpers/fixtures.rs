//! Input fixtures and command runners for demux integration tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;

use flate2::Compression;
use flate2::write::GzEncoder;

/// One cluster: index 1, index 2 and their shared quality character.
#[derive(Debug, Clone, Copy)]
pub struct Cluster {
    pub index1: &'static str,
    pub index2: &'static str,
    pub index_qual: char,
}

impl Cluster {
    pub const fn new(index1: &'static str, index2: &'static str, index_qual: char) -> Self {
        Self { index1, index2, index_qual }
    }
}

/// Paths of the four input FASTQs and the index file.
#[derive(Debug, Clone)]
pub struct DemuxInputs {
    pub index1: PathBuf,
    pub index2: PathBuf,
    pub read1: PathBuf,
    pub read2: PathBuf,
    pub index_file: PathBuf,
}

fn fastq_text(records: &[(String, String, String)]) -> String {
    records.iter().map(|(name, seq, qual)| format!("@{name}\n{seq}\n+\n{qual}\n")).collect()
}

/// Writes FASTQ records as plain text, or gzip when the name ends with `.gz`.
pub fn write_fastq(dir: &Path, name: &str, records: &[(String, String, String)]) -> PathBuf {
    let path = dir.join(name);
    let text = fastq_text(records);
    if name.ends_with(".gz") {
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();
    } else {
        fs::write(&path, text).unwrap();
    }
    path
}

/// Writes an index file with the standard five-column header and one row per index.
pub fn write_index_file(dir: &Path, indexes: &[&str]) -> PathBuf {
    let path = dir.join("indexes.tsv");
    let mut text = String::from("sample\tgroup\ttreatment\tindex\tindex sequence\n");
    for (i, index) in indexes.iter().enumerate() {
        text.push_str(&format!("sample{i}\tg{}\tcontrol\tB{i}\t{index}\n", i % 2));
    }
    fs::write(&path, text).unwrap();
    path
}

/// Writes the four FASTQs for `clusters`; read names are `r0`, `r1`, ...
///
/// Read 1 bases are `ACGTACGT` and read 2 bases are `TTGGCCAA` for every cluster.
pub fn write_inputs(dir: &Path, indexes: &[&str], clusters: &[Cluster], ext: &str) -> DemuxInputs {
    let index_records = |pick: fn(&Cluster) -> &'static str| -> Vec<(String, String, String)> {
        clusters
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let seq = pick(c);
                (format!("r{i} 1:N:0"), seq.to_string(), c.index_qual.to_string().repeat(seq.len()))
            })
            .collect()
    };
    let read_records = |bases: &str| -> Vec<(String, String, String)> {
        (0..clusters.len())
            .map(|i| (format!("r{i} 1:N:0"), bases.to_string(), "I".repeat(bases.len())))
            .collect()
    };

    DemuxInputs {
        index1: write_fastq(dir, &format!("I1.fq{ext}"), &index_records(|c| c.index1)),
        index2: write_fastq(dir, &format!("I2.fq{ext}"), &index_records(|c| c.index2)),
        read1: write_fastq(dir, &format!("R1.fq{ext}"), &read_records("ACGTACGT")),
        read2: write_fastq(dir, &format!("R2.fq{ext}"), &read_records("TTGGCCAA")),
        index_file: write_index_file(dir, indexes),
    }
}

/// Runs `fqdemux demux` with the given inputs, method and output directory plus extra args.
pub fn run_demux(inputs: &DemuxInputs, method: &str, output: &Path, extra: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_fqdemux"))
        .args([
            "demux",
            "--index1",
            inputs.index1.to_str().unwrap(),
            "--index2",
            inputs.index2.to_str().unwrap(),
            "--read1",
            inputs.read1.to_str().unwrap(),
            "--read2",
            inputs.read2.to_str().unwrap(),
            "--index-file",
            inputs.index_file.to_str().unwrap(),
            "--method",
            method,
            "--output",
            output.to_str().unwrap(),
        ])
        .args(extra)
        .output()
        .expect("Failed to run fqdemux")
}

/// Reads an output FASTQ and returns its header lines.
pub fn headers(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .step_by(4)
        .map(str::to_string)
        .collect()
}

/// Number of FASTQ records in a file.
pub fn record_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count() / 4
}
