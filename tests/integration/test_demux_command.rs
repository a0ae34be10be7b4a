//! Integration tests for the demux command.

use std::fs;

use fgoxide::io::DelimFile;
use fqdemux_metrics::{IndexPairMetric, PairCategory};
use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{Cluster, headers, record_count, run_demux, write_fastq, write_inputs};

const INDEXES: [&str; 3] = ["AAAA", "CCCC", "ACGT"];

/// Report line for a category total.
fn report_line(report: &str, label: &str) -> String {
    report.lines().find(|l| l.starts_with(label)).unwrap_or_default().to_string()
}

fn assert_success(output: &std::process::Output) {
    assert!(
        output.status.success(),
        "fqdemux failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_swapped_pair_is_counted_and_routed() {
    let dir = TempDir::new().unwrap();
    let clusters = [Cluster::new("AAAA", "GGGG", 'F')];
    let inputs = write_inputs(dir.path(), &["AAAA", "CCCC"], &clusters, "");
    let out = dir.path().join("out");

    assert_success(&run_demux(&inputs, "mean", &out, &["--quality-cutoff", "30"]));

    assert_eq!(headers(&out.join("unmatched_forward.fq")), ["@r0 1:N:0_AAAA-CCCC"]);
    assert_eq!(headers(&out.join("unmatched_reverse.fq")), ["@r0 1:N:0_AAAA-CCCC"]);
    assert_eq!(
        fs::read_to_string(out.join("unmatched_reverse.fq")).unwrap(),
        "@r0 1:N:0_AAAA-CCCC\nTTGGCCAA\n+\nIIIIIIII\n"
    );
    for name in ["AAAA_forward.fq", "CCCC_forward.fq", "unknown_lowqual_forward.fq"] {
        assert_eq!(record_count(&out.join(name)), 0, "{name}");
    }

    let report = fs::read_to_string(out.join("index_report.txt")).unwrap();
    assert_eq!(report_line(&report, "Total records"), "Total records\t1");
    assert_eq!(report_line(&report, "Dual matched records"), "Dual matched records\t0\t0.00%");
    assert_eq!(report_line(&report, "Index swapped records"), "Index swapped records\t1\t100.00%");
    assert!(report.contains("AAAA-CCCC\t1\t100.000%"));
    assert!(report.contains("CCCC-AAAA\t0\t0.000%"));
}

#[rstest]
#[case::plain("")]
#[case::gzip(".gz")]
fn test_mixed_run(#[case] ext: &str) {
    let dir = TempDir::new().unwrap();
    let clusters = [
        Cluster::new("AAAA", "TTTT", 'F'), // matched AAAA
        Cluster::new("CCCC", "GGGG", 'F'), // matched CCCC
        Cluster::new("ACGT", "ACGT", 'F'), // matched ACGT
        Cluster::new("AAAA", "GGGG", 'F'), // swapped AAAA-CCCC
        Cluster::new("CCCC", "ACGT", 'F'), // swapped CCCC-ACGT
        Cluster::new("AAAA", "TTTT", '#'), // matched, fails quality
        Cluster::new("ACGT", "TTTT", '#'), // swapped, fails quality
        Cluster::new("GGGG", "TTTT", 'F'), // unknown index 1
        Cluster::new("AANA", "TTTT", 'F'), // no-call
    ];
    let inputs = write_inputs(dir.path(), &INDEXES, &clusters, ext);
    let out = dir.path().join("out");
    let metrics_path = dir.path().join("metrics.tsv");

    let metrics_arg = metrics_path.to_str().unwrap();
    assert_success(&run_demux(&inputs, "avg", &out, &["--metrics", metrics_arg]));

    assert_eq!(headers(&out.join("AAAA_forward.fq")), ["@r0 1:N:0_AAAA-AAAA"]);
    assert_eq!(headers(&out.join("CCCC_reverse.fq")), ["@r1 1:N:0_CCCC-CCCC"]);
    assert_eq!(headers(&out.join("ACGT_forward.fq")), ["@r2 1:N:0_ACGT-ACGT"]);
    assert_eq!(
        headers(&out.join("unmatched_forward.fq")),
        ["@r3 1:N:0_AAAA-CCCC", "@r4 1:N:0_CCCC-ACGT"]
    );
    assert_eq!(
        headers(&out.join("unknown_lowqual_reverse.fq")),
        [
            "@r5 1:N:0_AAAA-AAAA",
            "@r6 1:N:0_ACGT-AAAA",
            "@r7 1:N:0_GGGG-AAAA",
            "@r8 1:N:0_AANA-AAAA",
        ]
    );

    let report = fs::read_to_string(out.join("index_report.txt")).unwrap();
    assert_eq!(report_line(&report, "Total records"), "Total records\t9");
    assert_eq!(report_line(&report, "Dual matched records"), "Dual matched records\t3\t33.33%");
    assert_eq!(report_line(&report, "Index swapped records"), "Index swapped records\t2\t22.22%");
    assert_eq!(
        report_line(&report, "Unknown or low quality records"),
        "Unknown or low quality records\t4\t44.44%"
    );
    assert!(report.contains("AAAA-AAAA\t1\t11.111%"));
    assert!(report.contains("ACGT-AAAA\t0\t0.000%"));

    let metrics: Vec<IndexPairMetric> = DelimFile::default().read_tsv(&metrics_path).unwrap();
    assert_eq!(metrics.len(), 3 + 6);
    let matched: u64 =
        metrics.iter().filter(|m| m.category == PairCategory::Matched).map(|m| m.count).sum();
    let swapped: u64 =
        metrics.iter().filter(|m| m.category == PairCategory::Swapped).map(|m| m.count).sum();
    // Every record is either in a pair table or unknown
    assert_eq!(matched + swapped + 4, 9);
    assert_eq!((matched, swapped), (3, 2));
}

#[test]
fn test_per_base_is_stricter_than_mean() {
    let dir = TempDir::new().unwrap();
    let mut inputs = write_inputs(dir.path(), &INDEXES, &[Cluster::new("AAAA", "TTTT", 'F')], "");
    // Mean of FF#F is 28.25, but one base scores 2
    inputs.index1 = write_fastq(
        dir.path(),
        "I1_lowbase.fq",
        &[("r0 1:N:0".to_string(), "AAAA".to_string(), "FF#F".to_string())],
    );

    let mean_out = dir.path().join("mean");
    assert_success(&run_demux(&inputs, "mean", &mean_out, &["-q", "25"]));
    assert_eq!(record_count(&mean_out.join("AAAA_forward.fq")), 1);

    let per_base_out = dir.path().join("per_base");
    assert_success(&run_demux(&inputs, "ind", &per_base_out, &["-q", "25"]));
    assert_eq!(record_count(&per_base_out.join("AAAA_forward.fq")), 0);
    assert_eq!(record_count(&per_base_out.join("unknown_lowqual_forward.fq")), 1);
}

#[test]
fn test_outputs_are_appended_across_runs() {
    let dir = TempDir::new().unwrap();
    let inputs = write_inputs(dir.path(), &INDEXES, &[Cluster::new("AAAA", "TTTT", 'F')], "");
    let out = dir.path().join("out");

    assert_success(&run_demux(&inputs, "mean", &out, &[]));
    assert_success(&run_demux(&inputs, "mean", &out, &[]));

    assert_eq!(record_count(&out.join("AAAA_forward.fq")), 2);
    // The report describes the latest run only
    let report = fs::read_to_string(out.join("index_report.txt")).unwrap();
    assert_eq!(report_line(&report, "Total records"), "Total records\t1");
}

#[test]
fn test_empty_inputs() {
    let dir = TempDir::new().unwrap();
    let inputs = write_inputs(dir.path(), &INDEXES, &[], "");
    let out = dir.path().join("out");

    assert_success(&run_demux(&inputs, "mean", &out, &[]));

    let report = fs::read_to_string(out.join("index_report.txt")).unwrap();
    assert!(report.contains("No records processed"));
    assert_eq!(report_line(&report, "Dual matched records"), "Dual matched records\t0\tNA");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2 * INDEXES.len() + 4 + 1);
}

#[test]
fn test_desynchronized_inputs_fail() {
    let dir = TempDir::new().unwrap();
    let clusters = [Cluster::new("AAAA", "TTTT", 'F'), Cluster::new("CCCC", "GGGG", 'F')];
    let mut inputs = write_inputs(dir.path(), &INDEXES, &clusters, "");
    inputs.read2 = write_fastq(
        dir.path(),
        "R2_short.fq",
        &[("r0 1:N:0".to_string(), "ACGT".to_string(), "IIII".to_string())],
    );
    let out = dir.path().join("out");

    let output = run_demux(&inputs, "mean", &out, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of sync at record 2"), "{stderr}");
    assert!(!out.join("index_report.txt").exists());
}

#[rstest]
#[case::bad_method("median", &[][..])]
#[case::cutoff_out_of_range("mean", &["--quality-cutoff", "94"][..])]
#[case::cutoff_not_a_number("per-base", &["--quality-cutoff", "high"][..])]
fn test_invalid_arguments(#[case] method: &str, #[case] extra: &[&str]) {
    let dir = TempDir::new().unwrap();
    let inputs = write_inputs(dir.path(), &INDEXES, &[Cluster::new("AAAA", "TTTT", 'F')], "");
    let out = dir.path().join("out");

    let output = run_demux(&inputs, method, &out, extra);
    assert!(!output.status.success());
    assert!(!out.join("index_report.txt").exists());
}

#[test]
fn test_malformed_index_file_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let mut inputs = write_inputs(dir.path(), &INDEXES, &[Cluster::new("AAAA", "TTTT", 'F')], "");
    let bad = dir.path().join("bad.tsv");
    fs::write(&bad, "sample\tgroup\ttreatment\tindex\tindex sequence\ns1\tg\tt\n").unwrap();
    inputs.index_file = bad;
    let out = dir.path().join("out");

    let output = run_demux(&inputs, "mean", &out, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "{stderr}");
    assert!(!out.exists());
}
