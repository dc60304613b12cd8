//! Workout history loading.
//!
//! History is the union of the CSV archive and the live JSONL log, with
//! duplicates removed by record id.

use crate::csv_rollup::CsvRow;
use crate::{Error, Result, WorkoutRecord};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

impl TryFrom<CsvRow> for WorkoutRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Other(format!("Invalid UUID: {}", e)))?;

        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| Error::Other(format!("Invalid date: {}", e)))?;

        Ok(WorkoutRecord {
            id,
            date,
            muscle_group: row.muscle_group.parse()?,
            exercise_name: row.exercise_name,
            weight: row.weight,
            reps: row.reps,
            sets: row.sets,
            estimated_1rm: row.estimated_1rm,
        })
    }
}

/// Load every workout from the CSV archive and the log
///
/// Returns records newest first. Within a day, later entries come first.
pub fn load_history(wal_path: &Path, csv_path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    // Archive first: it holds the older entries
    if csv_path.exists() {
        for record in load_records_from_csv(csv_path)? {
            if seen_ids.insert(record.id) {
                records.push(record);
            }
        }
        tracing::debug!("Loaded {} workouts from CSV", records.len());
    }

    if wal_path.exists() {
        let before = records.len();
        for record in crate::wal::read_records(wal_path)? {
            if seen_ids.insert(record.id) {
                records.push(record);
            }
        }
        tracing::debug!("Loaded {} workouts from log", records.len() - before);
    }

    // Append order is chronological; flip it, then stable-sort by date
    records.reverse();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    tracing::info!("Loaded {} total workouts", records.len());
    Ok(records)
}

/// Load workouts dated within the last `days` days of `today`
pub fn load_recent_history(
    wal_path: &Path,
    csv_path: &Path,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<WorkoutRecord>> {
    let cutoff = today - Duration::days(days);
    let mut records = load_history(wal_path, csv_path)?;
    records.retain(|r| r.date >= cutoff);
    Ok(records)
}

/// Load all records from a CSV archive
pub(crate) fn load_records_from_csv(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match WorkoutRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(records)
}

/// Records for one exercise, keeping the input order
pub fn records_for_exercise<'a>(
    records: &'a [WorkoutRecord],
    exercise_name: &str,
) -> Vec<&'a WorkoutRecord> {
    records
        .iter()
        .filter(|r| r.exercise_name == exercise_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::{JsonlSink, WorkoutSink};
    use crate::MuscleGroup;

    fn create_test_record(name: &str, date: NaiveDate) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            date,
            muscle_group: MuscleGroup::Legs,
            exercise_name: name.into(),
            weight: 100.0,
            reps: 5,
            sets: 1,
            estimated_1rm: Some(116.7),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn test_history_sorted_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&create_test_record("old", day(1))).unwrap();
        sink.append(&create_test_record("first today", day(5))).unwrap();
        sink.append(&create_test_record("second today", day(5))).unwrap();

        let records = load_history(&wal_path, &csv_path).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["second today", "first today", "old"]);
    }

    #[test]
    fn test_deduplication_across_wal_and_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let record = create_test_record("Barbell Squat", day(3));
        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&record).unwrap();

        crate::csv_rollup::wal_to_csv_and_archive(&wal_path, &csv_path).unwrap();

        // The same record shows up in the log again
        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&record).unwrap();

        let records = load_history(&wal_path, &csv_path).unwrap();
        assert_eq!(records.iter().filter(|r| r.id == record.id).count(), 1);
        assert_eq!(records[0].muscle_group, MuscleGroup::Legs);
        assert_eq!(records[0].estimated_1rm, Some(116.7));
    }

    #[test]
    fn test_recent_history_window() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&create_test_record("in", day(20))).unwrap();
        sink.append(&create_test_record("edge", day(13))).unwrap();
        sink.append(&create_test_record("out", day(12))).unwrap();

        let records = load_recent_history(&wal_path, &csv_path, day(20), 7).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.exercise_name != "out"));
    }

    #[test]
    fn test_bad_csv_rows_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");
        let good = Uuid::new_v4();
        std::fs::write(
            &csv_path,
            format!(
                "id,date,muscle_group,exercise_name,weight,reps,sets,estimated_1rm\n\
                 not-a-uuid,2024-08-01,Legs,Lunges,20,10,1,\n\
                 {},2024-08-02,Legs,Lunges,20,10,1,\n",
                good
            ),
        )
        .unwrap();

        let records = load_history(&temp_dir.path().join("none.wal"), &csv_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, good);
        assert_eq!(records[0].estimated_1rm, None);
    }

    #[test]
    fn test_records_for_exercise() {
        let records = vec![
            create_test_record("Lunges", day(2)),
            create_test_record("Leg Press", day(2)),
            create_test_record("Lunges", day(1)),
        ];
        assert_eq!(records_for_exercise(&records, "Lunges").len(), 2);
    }
}
