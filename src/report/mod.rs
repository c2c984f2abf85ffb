//! Narrative report generation.
//!
//! This module renders aggregate statistics and per-student views into
//! fixed-template natural-language text, which is then fed to the
//! summarizer.

pub mod narrative;

pub use narrative::{cohort_narrative, student_narrative};
