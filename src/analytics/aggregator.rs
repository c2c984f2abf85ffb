//! Aggregate statistics over student records.
//!
//! Every function here recomputes from the full record slice on each
//! call; there is no caching and no shared mutable state.

use crate::analytics::AnalyticsError;
use crate::models::{AggregateSummary, GradeDistribution, StudentPerformanceView, StudentRecord};
use std::collections::BTreeMap;

/// Number of students listed as top performers.
const TOP_PERFORMER_COUNT: usize = 5;

/// Attendance below this is flagged as a concern.
const ATTENDANCE_CONCERN_THRESHOLD: f64 = 80.0;

/// Compute the full aggregate summary for a record set.
///
/// An empty record set yields the explicit degenerate summary (zero
/// counts and averages, empty lists) rather than an arithmetic fault.
pub fn summarize(records: &[StudentRecord]) -> AggregateSummary {
    if records.is_empty() {
        return AggregateSummary::empty();
    }

    let total = records.len();

    let mut grade_sum = 0.0;
    let mut attendance_sum = 0.0;
    let mut distribution = GradeDistribution::default();

    for student in records {
        grade_sum += student.grade;
        attendance_sum += student.attendance;
        distribution.record(student.grade);
    }

    AggregateSummary {
        average_grade: grade_sum / total as f64,
        average_attendance: attendance_sum / total as f64,
        total_students: total,
        grade_distribution: distribution,
        subject_stats: subject_averages(records),
        top_performers: top_performers(records, TOP_PERFORMER_COUNT),
        attendance_concerns: attendance_concerns(records),
    }
}

/// Average grade per subject, only over students enrolled in it.
///
/// Subjects with no enrolled students never appear in the map, so no
/// entry can be NaN. Averages are rounded to one decimal place.
pub fn subject_averages(records: &[StudentRecord]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for student in records {
        for subject in &student.subjects {
            let entry = sums.entry(subject.clone()).or_insert((0.0, 0));
            entry.0 += student.grade;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(subject, (sum, count))| {
            let avg = sum / count as f64;
            (subject, (avg * 10.0).round() / 10.0)
        })
        .collect()
}

/// The `n` highest-graded students, descending.
///
/// The sort is stable, so students with equal grades keep their input
/// (id) order. Returns all records when fewer than `n` exist.
pub fn top_performers(records: &[StudentRecord], n: usize) -> Vec<StudentRecord> {
    let mut sorted: Vec<StudentRecord> = records.to_vec();
    sorted.sort_by(|a, b| {
        b.grade
            .partial_cmp(&a.grade)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

/// Students with attendance strictly below 80, in input order.
pub fn attendance_concerns(records: &[StudentRecord]) -> Vec<StudentRecord> {
    records
        .iter()
        .filter(|s| s.attendance < ATTENDANCE_CONCERN_THRESHOLD)
        .cloned()
        .collect()
}

/// Percentile rank of a student among all records.
///
/// Defined as the percentage of records with a grade strictly below the
/// target's grade. Ties are not counted as below, so students with equal
/// grades receive equal percentiles.
pub fn percentile(records: &[StudentRecord], id: u32) -> Result<f64, AnalyticsError> {
    let target = records
        .iter()
        .find(|s| s.id == id)
        .ok_or(AnalyticsError::StudentNotFound(id))?;

    let below = records.iter().filter(|s| s.grade < target.grade).count();
    Ok(below as f64 / records.len() as f64 * 100.0)
}

/// A student record paired with its percentile rank.
pub fn performance_view(
    records: &[StudentRecord],
    id: u32,
) -> Result<StudentPerformanceView, AnalyticsError> {
    let rank = percentile(records, id)?;
    let student = records
        .iter()
        .find(|s| s.id == id)
        .ok_or(AnalyticsError::StudentNotFound(id))?;

    Ok(StudentPerformanceView {
        student: student.clone(),
        percentile: rank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PerformanceMetrics;

    fn student(id: u32, grade: f64) -> StudentRecord {
        student_with(id, grade, 92.0, vec!["Mathematics"])
    }

    fn student_with(id: u32, grade: f64, attendance: f64, subjects: Vec<&str>) -> StudentRecord {
        StudentRecord {
            id,
            name: format!("Student {}", id),
            grade,
            attendance,
            subjects: subjects.into_iter().map(String::from).collect(),
            performance_metrics: PerformanceMetrics {
                homework_completion: 90.0,
                class_participation: 80.0,
                test_scores: [85.0, 88.0, 91.0],
            },
            last_updated: "2025-01-15 09:30:00".to_string(),
        }
    }

    #[test]
    fn test_summary_worked_example() {
        // records = [95, 70, 70, 50]
        let records = vec![
            student(1, 95.0),
            student(2, 70.0),
            student(3, 70.0),
            student(4, 50.0),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total_students, 4);

        let dist = summary.grade_distribution;
        assert_eq!(dist.excellent, 1);
        assert_eq!(dist.good, 0);
        assert_eq!(dist.satisfactory, 2);
        assert_eq!(dist.needs_improvement, 0);
        assert_eq!(dist.at_risk, 1);
        assert_eq!(dist.total(), 4);

        assert_eq!(percentile(&records, 4).unwrap(), 0.0);
        assert_eq!(percentile(&records, 2).unwrap(), 25.0);
        assert_eq!(percentile(&records, 1).unwrap(), 75.0);
    }

    #[test]
    fn test_histogram_counts_every_record_once() {
        let grades = [100.0, 90.0, 89.9, 80.0, 79.9, 70.0, 69.9, 60.0, 59.9, 0.0];
        let records: Vec<StudentRecord> = grades
            .iter()
            .enumerate()
            .map(|(i, g)| student(i as u32 + 1, *g))
            .collect();

        let summary = summarize(&records);
        assert_eq!(summary.grade_distribution.total(), records.len());
    }

    #[test]
    fn test_global_averages() {
        let records = vec![
            student_with(1, 80.0, 70.0, vec!["Physics"]),
            student_with(2, 90.0, 90.0, vec!["Physics"]),
        ];

        let summary = summarize(&records);
        assert!((summary.average_grade - 85.0).abs() < 1e-9);
        assert!((summary.average_attendance - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_records_degenerate_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_students, 0);
        assert_eq!(summary.average_grade, 0.0);
        assert_eq!(summary.average_attendance, 0.0);
        assert_eq!(summary.grade_distribution.total(), 0);
        assert!(summary.subject_stats.is_empty());
        assert!(summary.top_performers.is_empty());
        assert!(summary.attendance_concerns.is_empty());
    }

    #[test]
    fn test_subject_averages_only_present_subjects() {
        let records = vec![
            student_with(1, 80.0, 92.0, vec!["Mathematics", "Physics"]),
            student_with(2, 90.0, 92.0, vec!["Mathematics"]),
        ];

        let stats = subject_averages(&records);
        assert_eq!(stats.get("Mathematics"), Some(&85.0));
        assert_eq!(stats.get("Physics"), Some(&80.0));
        assert!(!stats.contains_key("Chemistry"));
        for avg in stats.values() {
            assert!(avg.is_finite());
        }
    }

    #[test]
    fn test_top_performers_sorted_and_capped() {
        let records: Vec<StudentRecord> = (1..=8).map(|i| student(i, 60.0 + i as f64)).collect();

        let top = top_performers(&records, 5);
        assert_eq!(top.len(), 5);
        for pair in top.windows(2) {
            assert!(pair[0].grade >= pair[1].grade);
        }
        assert_eq!(top[0].id, 8);
    }

    #[test]
    fn test_top_performers_fewer_than_five() {
        let records = vec![student(1, 70.0), student(2, 90.0)];
        let top = top_performers(&records, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, 2);
    }

    #[test]
    fn test_top_performers_stable_on_ties() {
        let records = vec![
            student(1, 88.0),
            student(2, 95.0),
            student(3, 88.0),
            student(4, 88.0),
        ];

        let top = top_performers(&records, 5);
        assert_eq!(
            top.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![2, 1, 3, 4]
        );
    }

    #[test]
    fn test_attendance_concerns_strictly_below_80() {
        let records = vec![
            student_with(1, 85.0, 80.0, vec!["History"]),
            student_with(2, 85.0, 79.9, vec!["History"]),
            student_with(3, 85.0, 75.0, vec!["History"]),
        ];

        let concerns = attendance_concerns(&records);
        assert_eq!(concerns.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_percentile_extremes() {
        let records: Vec<StudentRecord> = (1..=10).map(|i| student(i, 60.0 + i as f64)).collect();

        // Unique minimum sits below nobody; unique maximum sits above N-1.
        assert_eq!(percentile(&records, 1).unwrap(), 0.0);
        assert_eq!(percentile(&records, 10).unwrap(), 90.0);
    }

    #[test]
    fn test_percentile_ties_are_equal() {
        let records = vec![
            student(1, 70.0),
            student(2, 85.0),
            student(3, 85.0),
            student(4, 85.0),
            student(5, 95.0),
        ];

        let p2 = percentile(&records, 2).unwrap();
        let p3 = percentile(&records, 3).unwrap();
        let p4 = percentile(&records, 4).unwrap();
        assert_eq!(p2, p3);
        assert_eq!(p3, p4);
        // Ties are excluded from the numerator: only id 1 is strictly below.
        assert_eq!(p2, 20.0);
    }

    #[test]
    fn test_percentile_unknown_id() {
        let records = vec![student(1, 80.0)];
        assert_eq!(
            percentile(&records, 42),
            Err(AnalyticsError::StudentNotFound(42))
        );
    }

    #[test]
    fn test_performance_view() {
        let records = vec![student(1, 70.0), student(2, 90.0)];
        let view = performance_view(&records, 2).unwrap();
        assert_eq!(view.student.id, 2);
        assert_eq!(view.percentile, 50.0);

        assert!(performance_view(&records, 9).is_err());
    }
}
