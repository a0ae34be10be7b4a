//! Logging helpers: duration and rate formatting, operation timing and the run summary.

use std::time::{Duration, Instant};

use fqdemux_metrics::{format_count, format_percent, rounded_percent};

use crate::stats::DemuxCounts;

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use fqdemux_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => match (secs / 60, secs % 60) {
            (mins, 0) => format!("{mins}m"),
            (mins, rest) => format!("{mins}m {rest}s"),
        },
        _ => match (secs / 3600, (secs % 3600) / 60) {
            (hours, 0) => format!("{hours}h"),
            (hours, mins) => format!("{hours}h {mins}m"),
        },
    }
}

/// Formats a processing rate in records per second, or per minute when below one per second.
///
/// ```
/// use fqdemux_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 records/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 records/min");
/// ```
#[must_use]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} records/s", format_count(count));
    }
    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} records/s", format_count(rate as u64))
    } else {
        format!("{:.1} records/min", rate * 60.0)
    }
}

/// Logs the category totals of a run.
pub fn log_demux_summary(counts: &DemuxCounts) {
    log::info!("Demultiplexing Summary:");
    log::info!("  Total read quads: {}", format_count(counts.total));
    if counts.total == 0 {
        log::warn!("  No records processed");
        return;
    }
    for (label, count) in [
        ("Dual matched", counts.matched),
        ("Index swapped", counts.swapped),
        ("Unknown or low quality", counts.unknown),
    ] {
        let pct = format_percent(rounded_percent(count, counts.total, 2), 2);
        log::info!("  {label}: {} ({pct}%)", format_count(count));
    }
}

/// Logs the start of an operation on creation and its duration and rate on completion.
///
/// ```no_run
/// use fqdemux_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Demultiplexing reads");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_completion(&self, count: u64) {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} read quads in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
