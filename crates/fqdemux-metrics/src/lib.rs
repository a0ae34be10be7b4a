#![deny(unsafe_code)]

//! Structured metric types and TSV writer for fqdemux.
//!
//! This crate provides:
//! - [`Metric`] trait for serializable metric rows
//! - [`demux`] per-index-pair metric rows
//! - [`writer`] module for TSV file output
//! - count and percentage formatting shared by the text report and the logs

pub mod demux;
pub mod writer;

use serde::{Deserialize, Serialize};

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages.
    fn metric_name() -> &'static str;
}

/// Formats a count with thousands separators (e.g. `1234567` -> `"1,234,567"`).
///
/// # Example
/// ```
/// use fqdemux_metrics::format_count;
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Rounds `value` to `decimals` decimal places, halves rounded to the even digit.
///
/// # Example
/// ```
/// use fqdemux_metrics::round_to;
/// assert_eq!(round_to(0.125, 2), 0.12);
/// assert_eq!(round_to(0.375, 2), 0.38);
/// ```
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Computes `count / total * 100` rounded to `decimals` places.
///
/// Returns `None` when `total` is zero: there is no meaningful percentage of an empty run.
///
/// # Example
/// ```
/// use fqdemux_metrics::rounded_percent;
/// assert_eq!(rounded_percent(1, 3, 2), Some(33.33));
/// assert_eq!(rounded_percent(1, 3, 3), Some(33.333));
/// assert_eq!(rounded_percent(5, 0, 2), None);
/// ```
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "read counts never exceed 2^53")]
pub fn rounded_percent(count: u64, total: u64, decimals: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(round_to(count as f64 / total as f64 * 100.0, decimals))
}

/// Formats an optional percentage with a fixed number of decimals, or `NA` when absent.
///
/// # Example
/// ```
/// use fqdemux_metrics::format_percent;
/// assert_eq!(format_percent(Some(50.0), 2), "50.00");
/// assert_eq!(format_percent(None, 3), "NA");
/// ```
#[must_use]
pub fn format_percent(percent: Option<f64>, decimals: u32) -> String {
    match percent {
        Some(value) => format!("{value:.prec$}", prec = decimals as usize),
        None => "NA".to_string(),
    }
}

pub use demux::{IndexPairMetric, PairCategory};
pub use writer::{write_metrics, write_metrics_auto};
