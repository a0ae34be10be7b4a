//! Periodic progress logging for the record loop.

use log::info;
use std::time::Instant;

use fqdemux_metrics::format_count;

use crate::logging::format_rate;

/// Default number of records between progress messages.
pub const DEFAULT_INTERVAL: u64 = 1_000_000;

/// Counts processed records and logs each time the count crosses a multiple of the interval.
///
/// # Example
/// ```
/// use fqdemux_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Processed read quads").with_interval(100);
/// for _ in 0..250 {
///     tracker.add(1); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Processed read quads 250 (complete)"
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
    started: Instant,
}

impl ProgressTracker {
    /// Creates a tracker with a count of 0 and an interval of [`DEFAULT_INTERVAL`].
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            message: message.into(),
            count: 0,
            started: Instant::now(),
        }
    }

    /// Sets the logging interval. An interval of 0 is treated as 1.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds to the count, logging once for every interval boundary crossed.
    ///
    /// Returns true if the new count is exactly on a boundary.
    pub fn add(&mut self, additional: u64) -> bool {
        let prev = self.count;
        self.count += additional;

        for i in (prev / self.interval + 1)..=(self.count / self.interval) {
            let milestone = i * self.interval;
            info!(
                "{} {} ({})",
                self.message,
                format_count(milestone),
                format_rate(milestone, self.started.elapsed())
            );
        }
        self.on_boundary()
    }

    /// Logs the final count unless it was just logged as a boundary, or is zero.
    pub fn log_final(&self) {
        if self.count > 0 && !self.on_boundary() {
            info!("{} {} (complete)", self.message, format_count(self.count));
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    fn on_boundary(&self) -> bool {
        self.count > 0 && self.count.is_multiple_of(self.interval)
    }
}
