//! Sync orchestration
//!
//! - [`orchestrator`] - the per-location state machine
//! - [`driver`] - sequential batch iteration over the roster
//! - [`summary`] - per-run counters

pub mod driver;
pub mod orchestrator;
pub mod summary;

pub use driver::BatchDriver;
pub use orchestrator::SyncOrchestrator;
pub use summary::SyncSummary;
