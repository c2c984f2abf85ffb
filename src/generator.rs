//! Synthetic student data generation and the in-memory record store.
//!
//! Records are generated once at process startup from fixed name and
//! subject catalogs. The resulting [`RecordStore`] is read-only for the
//! life of the process, so concurrent request handlers can share it
//! without locking.

use crate::models::{PerformanceMetrics, StudentRecord};
use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Timestamp format used for `last_updated`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// First name catalog for generated students.
const FIRST_NAMES: [&str; 20] = [
    "Emma", "Liam", "Olivia", "Noah", "Ava", "Ethan", "Sophia", "Mason", "Isabella", "William",
    "Mia", "James", "Charlotte", "Benjamin", "Amelia", "Lucas", "Harper", "Henry", "Evelyn",
    "Alexander",
];

/// Last name catalog for generated students.
const LAST_NAMES: [&str; 20] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin",
];

/// Subject catalog; each student is enrolled in exactly four of these.
pub const SUBJECTS: [&str; 8] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English Literature",
    "History",
    "Geography",
    "Computer Science",
];

/// Number of subjects each student is enrolled in.
const SUBJECTS_PER_STUDENT: usize = 4;

/// Round to one decimal place, matching the precision of stored grades.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Generate `count` synthetic student records with sequential ids 1..count.
///
/// Names may repeat across records; there is no dedup guarantee and no
/// determinism requirement between invocations.
pub fn generate_students(count: u32) -> Vec<StudentRecord> {
    let mut rng = rand::thread_rng();
    let now = Local::now();

    (1..=count)
        .map(|id| {
            let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Emma");
            let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Smith");

            let subjects: Vec<String> = SUBJECTS
                .choose_multiple(&mut rng, SUBJECTS_PER_STUDENT)
                .map(|s| s.to_string())
                .collect();

            let test_scores = [
                round1(rng.gen_range(60.0..=100.0)),
                round1(rng.gen_range(60.0..=100.0)),
                round1(rng.gen_range(60.0..=100.0)),
            ];

            let days_ago = rng.gen_range(0..=7);
            let last_updated = (now - chrono::Duration::days(days_ago))
                .format(TIMESTAMP_FORMAT)
                .to_string();

            StudentRecord {
                id,
                name: format!("{} {}", first, last),
                grade: round1(rng.gen_range(60.0..=100.0)),
                attendance: round1(rng.gen_range(75.0..=100.0)),
                subjects,
                performance_metrics: PerformanceMetrics {
                    homework_completion: round1(rng.gen_range(70.0..=100.0)),
                    class_participation: round1(rng.gen_range(65.0..=100.0)),
                    test_scores,
                },
                last_updated,
            }
        })
        .collect()
}

/// Immutable in-memory collection of student records.
///
/// Constructed once at startup and shared behind an `Arc`; holds no
/// interior mutability.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<StudentRecord>,
}

impl RecordStore {
    /// Wrap an existing record list.
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    /// Generate a fresh store with `count` synthetic records.
    pub fn generate(count: u32) -> Self {
        let records = generate_students(count);
        info!("Generated {} student records", records.len());
        Self { records }
    }

    /// All records, in id order.
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Look up a single record by id.
    pub fn find(&self, id: u32) -> Option<&StudentRecord> {
        self.records.iter().find(|s| s.id == id)
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[allow(dead_code)] // Companion to len()
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_dense_and_unique() {
        let students = generate_students(50);
        assert_eq!(students.len(), 50);

        let ids: Vec<u32> = students.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_generated_ranges() {
        for student in generate_students(100) {
            assert!((60.0..=100.0).contains(&student.grade), "grade {}", student.grade);
            assert!(
                (75.0..=100.0).contains(&student.attendance),
                "attendance {}",
                student.attendance
            );

            let metrics = &student.performance_metrics;
            assert!((70.0..=100.0).contains(&metrics.homework_completion));
            assert!((65.0..=100.0).contains(&metrics.class_participation));
            for score in metrics.test_scores {
                assert!((60.0..=100.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_subjects_distinct_and_from_catalog() {
        for student in generate_students(40) {
            assert_eq!(student.subjects.len(), 4);

            let unique: HashSet<&str> = student.subjects.iter().map(String::as_str).collect();
            assert_eq!(unique.len(), 4, "duplicate subject for {}", student.name);

            for subject in &student.subjects {
                assert!(SUBJECTS.contains(&subject.as_str()));
            }
        }
    }

    #[test]
    fn test_timestamp_format_parses() {
        for student in generate_students(10) {
            NaiveDateTime::parse_from_str(&student.last_updated, TIMESTAMP_FORMAT)
                .unwrap_or_else(|e| panic!("bad timestamp {}: {}", student.last_updated, e));
        }
    }

    #[test]
    fn test_one_decimal_rounding() {
        for student in generate_students(30) {
            let scaled = student.grade * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "grade {}", student.grade);
        }
    }

    #[test]
    fn test_store_lookup() {
        let store = RecordStore::generate(10);
        assert_eq!(store.len(), 10);
        assert!(!store.is_empty());
        assert_eq!(store.find(1).map(|s| s.id), Some(1));
        assert_eq!(store.find(10).map(|s| s.id), Some(10));
        assert!(store.find(11).is_none());
        assert!(store.find(0).is_none());
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::new(Vec::new());
        assert!(store.is_empty());
        assert!(store.find(1).is_none());
    }
}
