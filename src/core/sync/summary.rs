//! Sync run summary

use std::time::Duration;

/// Counters for one batch run
///
/// Filled in by the orchestrator and driver, logged and printed at the end of
/// the run.
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Locations fully synchronized
    pub locations_completed: usize,

    /// Units processed in this run
    pub units_processed: usize,

    /// Units skipped because the progress document already held them
    pub units_skipped: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl SyncSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total units the run looked at
    pub fn total_units(&self) -> usize {
        self.units_processed + self.units_skipped
    }

    /// Log the summary with structured fields
    pub fn log_summary(&self) {
        tracing::info!(
            locations_completed = self.locations_completed,
            units_processed = self.units_processed,
            units_skipped = self.units_skipped,
            duration_ms = self.duration.as_millis() as u64,
            "Sync run finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_zeroed() {
        let summary = SyncSummary::new();
        assert_eq!(summary.locations_completed, 0);
        assert_eq!(summary.total_units(), 0);
    }

    #[test]
    fn test_total_units() {
        let summary = SyncSummary {
            units_processed: 3,
            units_skipped: 2,
            ..SyncSummary::new()
        };
        assert_eq!(summary.total_units(), 5);
    }

    #[test]
    fn test_with_duration() {
        let summary = SyncSummary::new().with_duration(Duration::from_secs(2));
        assert_eq!(summary.duration, Duration::from_secs(2));
    }
}
