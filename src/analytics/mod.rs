//! Student analytics aggregation engine.
//!
//! Turns the flat record list into grade distributions, subject-wise
//! statistics, percentile ranks, and top/bottom cohorts.

pub mod aggregator;

pub use aggregator::{percentile, performance_view, summarize};

use thiserror::Error;

/// Errors produced by the aggregation engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The requested student id does not exist in the record store.
    #[error("Student not found: {0}")]
    StudentNotFound(u32),
}
