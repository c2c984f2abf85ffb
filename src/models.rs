//! Data models for the student analytics dashboard.
//!
//! This module contains all the core data structures used throughout
//! the application for representing students, grade distributions, and
//! aggregate summaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Grade histogram band.
///
/// Every finite grade falls into exactly one band. The top band is
/// inclusive on both ends; the middle bands are right-open; everything
/// below 60 lands in [`GradeBand::AtRisk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    /// 90-100 (inclusive)
    Excellent,
    /// 80-89
    Good,
    /// 70-79
    Satisfactory,
    /// 60-69
    NeedsImprovement,
    /// Below 60
    AtRisk,
}

impl GradeBand {
    /// All bands in display order, highest first.
    pub const ALL: [GradeBand; 5] = [
        GradeBand::Excellent,
        GradeBand::Good,
        GradeBand::Satisfactory,
        GradeBand::NeedsImprovement,
        GradeBand::AtRisk,
    ];

    /// Classify a grade into its band.
    pub fn of(grade: f64) -> Self {
        if grade >= 90.0 {
            GradeBand::Excellent
        } else if grade >= 80.0 {
            GradeBand::Good
        } else if grade >= 70.0 {
            GradeBand::Satisfactory
        } else if grade >= 60.0 {
            GradeBand::NeedsImprovement
        } else {
            GradeBand::AtRisk
        }
    }

    /// Stable range label used in JSON output and narrative text.
    pub fn label(&self) -> &'static str {
        match self {
            GradeBand::Excellent => "90-100",
            GradeBand::Good => "80-89",
            GradeBand::Satisfactory => "70-79",
            GradeBand::NeedsImprovement => "60-69",
            GradeBand::AtRisk => "Below 60",
        }
    }

    /// Human-readable name used in the narrative report.
    pub fn description(&self) -> &'static str {
        match self {
            GradeBand::Excellent => "Excellent",
            GradeBand::Good => "Good",
            GradeBand::Satisfactory => "Satisfactory",
            GradeBand::NeedsImprovement => "Needs Improvement",
            GradeBand::AtRisk => "At Risk",
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Student counts per grade band.
///
/// All five bands are always present in the serialized form, keyed by
/// their range labels, even when a count is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution {
    #[serde(rename = "90-100")]
    pub excellent: usize,
    #[serde(rename = "80-89")]
    pub good: usize,
    #[serde(rename = "70-79")]
    pub satisfactory: usize,
    #[serde(rename = "60-69")]
    pub needs_improvement: usize,
    #[serde(rename = "Below 60")]
    pub at_risk: usize,
}

impl GradeDistribution {
    /// Add a grade to the appropriate band.
    pub fn record(&mut self, grade: f64) {
        match GradeBand::of(grade) {
            GradeBand::Excellent => self.excellent += 1,
            GradeBand::Good => self.good += 1,
            GradeBand::Satisfactory => self.satisfactory += 1,
            GradeBand::NeedsImprovement => self.needs_improvement += 1,
            GradeBand::AtRisk => self.at_risk += 1,
        }
    }

    /// Count for a single band.
    pub fn count(&self, band: GradeBand) -> usize {
        match band {
            GradeBand::Excellent => self.excellent,
            GradeBand::Good => self.good,
            GradeBand::Satisfactory => self.satisfactory,
            GradeBand::NeedsImprovement => self.needs_improvement,
            GradeBand::AtRisk => self.at_risk,
        }
    }

    /// Total students across all bands.
    #[allow(dead_code)] // Invariant helper exercised by tests
    pub fn total(&self) -> usize {
        self.excellent + self.good + self.satisfactory + self.needs_improvement + self.at_risk
    }
}

/// Per-student performance metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Homework completion percentage.
    pub homework_completion: f64,
    /// Class participation percentage.
    pub class_participation: f64,
    /// The three most recent test scores, in order.
    pub test_scores: [f64; 3],
}

impl PerformanceMetrics {
    /// Whether any test score falls below the given threshold.
    pub fn any_test_below(&self, threshold: f64) -> bool {
        self.test_scores.iter().any(|score| *score < threshold)
    }
}

/// A single student record.
///
/// Records are constructed once at startup and never mutated; every
/// aggregate is recomputed from the full record list on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique identifier, dense 1..N.
    pub id: u32,
    /// Full name.
    pub name: String,
    /// Overall grade, 0-100.
    pub grade: f64,
    /// Attendance rate, 0-100.
    pub attendance: f64,
    /// Exactly four distinct enrolled subjects.
    pub subjects: Vec<String>,
    /// Detailed performance metrics.
    pub performance_metrics: PerformanceMetrics,
    /// Last update timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub last_updated: String,
}

impl StudentRecord {
    /// The grade band this student falls into.
    #[allow(dead_code)] // Utility accessor
    pub fn band(&self) -> GradeBand {
        GradeBand::of(self.grade)
    }
}

/// Aggregate statistics over the full record set.
///
/// Recomputed from the record store on every request; never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Arithmetic mean grade, 0.0 when there are no records.
    pub average_grade: f64,
    /// Arithmetic mean attendance, 0.0 when there are no records.
    pub average_attendance: f64,
    /// Total record count.
    pub total_students: usize,
    /// Histogram over the five grade bands.
    pub grade_distribution: GradeDistribution,
    /// Average grade per subject, only for subjects with at least one student.
    pub subject_stats: BTreeMap<String, f64>,
    /// Up to five students with the highest grades, descending.
    pub top_performers: Vec<StudentRecord>,
    /// Students with attendance strictly below 80, in input order.
    pub attendance_concerns: Vec<StudentRecord>,
}

impl AggregateSummary {
    /// The degenerate summary for an empty record set.
    pub fn empty() -> Self {
        Self {
            average_grade: 0.0,
            average_attendance: 0.0,
            total_students: 0,
            grade_distribution: GradeDistribution::default(),
            subject_stats: BTreeMap::new(),
            top_performers: Vec::new(),
            attendance_concerns: Vec::new(),
        }
    }
}

/// A single student together with their percentile rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentPerformanceView {
    /// The student record.
    pub student: StudentRecord,
    /// Percentage of students with a strictly lower grade.
    pub percentile: f64,
}
