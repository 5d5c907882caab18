//! State management for resumable sync runs
//!
//! The [`ProgressStore`] is the durable record of which units have completed
//! for which locations. It is what makes re-running the program after a crash
//! a resumption instead of a restart.

pub mod progress;

pub use progress::ProgressStore;
