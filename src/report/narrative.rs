//! Fixed-template narrative text generation.
//!
//! Renders an [`AggregateSummary`] or a single student view into a
//! multi-section plain-text report. Pure text rendering over already
//! validated data; no error paths.

use crate::models::{AggregateSummary, GradeBand, StudentRecord};

/// A recommendation rule: first matching rule in a table wins.
pub struct Rule {
    /// Whether this rule applies to the student.
    pub applies: fn(&StudentRecord, f64) -> bool,
    /// The recommendation text emitted when it does.
    pub message: &'static str,
}

/// Performance recommendations, evaluated in priority order.
pub const PERFORMANCE_RULES: &[Rule] = &[
    Rule {
        applies: |s, _| s.grade >= 90.0,
        message: "Maintain current performance level",
    },
    Rule {
        applies: |s, _| s.performance_metrics.any_test_below(70.0),
        message: "Focus on improving test scores",
    },
    Rule {
        applies: |_, _| true,
        message: "Work on class participation",
    },
];

/// Attendance recommendations, evaluated in priority order.
pub const ATTENDANCE_RULES: &[Rule] = &[
    Rule {
        applies: |s, _| s.attendance >= 95.0,
        message: "Excellent attendance",
    },
    Rule {
        applies: |s, _| s.attendance < 85.0,
        message: "Consider improving attendance",
    },
    Rule {
        applies: |_, _| true,
        message: "Good attendance, room for improvement",
    },
];

/// Trajectory recommendations based on percentile, in priority order.
pub const TRAJECTORY_RULES: &[Rule] = &[
    Rule {
        applies: |_, percentile| percentile >= 90.0,
        message: "Consider advanced placement",
    },
    Rule {
        applies: |_, percentile| percentile < 50.0,
        message: "Focus on core subjects",
    },
    Rule {
        applies: |_, _| true,
        message: "Continue current study plan",
    },
];

/// Evaluate a rule table; the last rule is a catch-all so a match always exists.
pub fn first_match(rules: &[Rule], student: &StudentRecord, percentile: f64) -> &'static str {
    rules
        .iter()
        .find(|rule| (rule.applies)(student, percentile))
        .map(|rule| rule.message)
        .unwrap_or("Continue current study plan")
}

/// Generate the cohort-wide narrative report.
pub fn cohort_narrative(summary: &AggregateSummary) -> String {
    let mut output = String::new();

    output.push_str("Comprehensive Student Performance Analysis:\n\n");
    output.push_str(&overall_section(summary));
    output.push_str(&distribution_section(summary));
    output.push_str(&subject_section(summary));
    output.push_str(&top_performers_section(summary));
    output.push_str(&attendance_section(summary));
    output.push_str(&cohort_recommendations_section(summary));

    output
}

/// Overall statistics section.
fn overall_section(summary: &AggregateSummary) -> String {
    let mut section = String::new();

    section.push_str("Overall Statistics:\n");
    section.push_str(&format!("- Average Grade: {:.2}%\n", summary.average_grade));
    section.push_str(&format!(
        "- Average Attendance: {:.2}%\n",
        summary.average_attendance
    ));
    section.push_str(&format!("- Total Students: {}\n\n", summary.total_students));

    section
}

/// Grade distribution section; all five bands are always listed.
fn distribution_section(summary: &AggregateSummary) -> String {
    let mut section = String::new();

    section.push_str("Grade Distribution:\n");
    for band in GradeBand::ALL {
        section.push_str(&format!(
            "- {} ({}): {} students\n",
            band.description(),
            band.label(),
            summary.grade_distribution.count(band)
        ));
    }
    section.push('\n');

    section
}

/// Subject-wise performance section; only subjects with data appear.
fn subject_section(summary: &AggregateSummary) -> String {
    let mut section = String::new();

    section.push_str("Subject-wise Performance:\n");
    if summary.subject_stats.is_empty() {
        section.push_str("- No subject data available\n");
    } else {
        for (subject, avg) in &summary.subject_stats {
            section.push_str(&format!("- {}: {}%\n", subject, avg));
        }
    }
    section.push('\n');

    section
}

/// Top performers section.
fn top_performers_section(summary: &AggregateSummary) -> String {
    let mut section = String::new();

    section.push_str("Top Performers:\n");
    if summary.top_performers.is_empty() {
        section.push_str("- No students recorded\n");
    } else {
        for student in &summary.top_performers {
            section.push_str(&format!("- {}: {}%\n", student.name, student.grade));
        }
    }
    section.push('\n');

    section
}

/// Attendance concerns section.
fn attendance_section(summary: &AggregateSummary) -> String {
    let mut section = String::new();

    section.push_str("Attendance Concerns:\n");
    if summary.attendance_concerns.is_empty() {
        section.push_str("- No attendance concerns\n");
    } else {
        for student in &summary.attendance_concerns {
            section.push_str(&format!("- {}: {}%\n", student.name, student.attendance));
        }
    }
    section.push('\n');

    section
}

/// Cohort-level recommendations selected by condition.
fn cohort_recommendations_section(summary: &AggregateSummary) -> String {
    let mut section = String::new();

    section.push_str("Recommendations:\n");
    for (i, rec) in cohort_recommendations(summary).iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, rec));
    }

    section
}

/// Select cohort recommendations from the summary; every matching rule
/// contributes one line and the trend line always closes the list.
pub fn cohort_recommendations(summary: &AggregateSummary) -> Vec<&'static str> {
    let mut recommendations = Vec::new();

    if !summary.attendance_concerns.is_empty() {
        recommendations.push("Focus on students with attendance below 80%");
    }
    if summary.grade_distribution.at_risk > 0 {
        recommendations.push("Provide additional support for students scoring below 60%");
    }
    if !summary.top_performers.is_empty() {
        recommendations.push("Consider advanced programs for top performers");
    }
    recommendations.push("Monitor subject-wise performance trends");

    recommendations
}

/// Generate the narrative report for a single student.
pub fn student_narrative(student: &StudentRecord, percentile: f64) -> String {
    let mut output = String::new();

    output.push_str("Detailed Student Performance Analysis:\n\n");

    output.push_str("Student Information:\n");
    output.push_str(&format!("Name: {}\n", student.name));
    output.push_str(&format!("Overall Grade: {}%\n", student.grade));
    output.push_str(&format!("Attendance Rate: {}%\n", student.attendance));
    output.push_str(&format!("Performance Percentile: {:.1}%\n\n", percentile));

    output.push_str("Subject Performance:\n");
    for subject in &student.subjects {
        output.push_str(&format!("- {}\n", subject));
    }
    output.push('\n');

    let metrics = &student.performance_metrics;
    output.push_str("Detailed Metrics:\n");
    output.push_str(&format!(
        "- Homework Completion: {}%\n",
        metrics.homework_completion
    ));
    output.push_str(&format!(
        "- Class Participation: {}%\n",
        metrics.class_participation
    ));
    let scores: Vec<String> = metrics
        .test_scores
        .iter()
        .map(|score| format!("{}%", score))
        .collect();
    output.push_str(&format!("- Test Scores: {}\n\n", scores.join(", ")));

    output.push_str(&format!("Last Updated: {}\n\n", student.last_updated));

    output.push_str("Recommendations:\n");
    output.push_str(&format!(
        "1. {}\n",
        first_match(PERFORMANCE_RULES, student, percentile)
    ));
    output.push_str(&format!(
        "2. {}\n",
        first_match(ATTENDANCE_RULES, student, percentile)
    ));
    output.push_str(&format!(
        "3. {}\n",
        first_match(TRAJECTORY_RULES, student, percentile)
    ));

    output
}
