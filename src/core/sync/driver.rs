//! Batch driver
//!
//! Iterates the orchestrator over the roster, strictly sequentially, sharing
//! one progress store across all locations. There is no isolation between
//! locations: the first fatal error terminates the batch, and later roster
//! entries are not attempted. Retry is an operational decision made by
//! re-invoking the program, which resumes from the progress document.

use crate::core::state::ProgressStore;
use crate::core::sync::orchestrator::SyncOrchestrator;
use crate::core::sync::summary::SyncSummary;
use crate::domain::ids::LocationId;
use crate::domain::Result;
use std::time::Instant;

/// Runs the orchestrator over every location in the roster
pub struct BatchDriver {
    orchestrator: SyncOrchestrator,
}

impl BatchDriver {
    /// Create a driver around an orchestrator
    pub fn new(orchestrator: SyncOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Run the batch
    ///
    /// # Errors
    ///
    /// Returns the first location's error, abandoning the rest of the roster.
    pub async fn run(
        &self,
        roster: &[LocationId],
        progress: &mut ProgressStore,
    ) -> Result<SyncSummary> {
        let start = Instant::now();
        let mut summary = SyncSummary::new();

        tracing::info!(locations = roster.len(), "Starting batch run");

        for location in roster {
            self.orchestrator
                .sync_location(location, progress, &mut summary)
                .await?;
            summary.locations_completed += 1;
        }

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}
