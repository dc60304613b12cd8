//! CSV rollup for archiving the workout log.
//!
//! Moves records out of the JSONL log into a long-lived CSV history file
//! without ever losing a record.

use crate::{Result, WorkoutRecord};
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use uuid::Uuid;

/// A row in the CSV archive
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct CsvRow {
    pub id: String,
    pub date: String,
    pub muscle_group: String,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
    pub estimated_1rm: Option<f64>,
}

impl From<&WorkoutRecord> for CsvRow {
    fn from(record: &WorkoutRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            date: record.date.format("%Y-%m-%d").to_string(),
            muscle_group: record.muscle_group.to_string(),
            exercise_name: record.exercise_name.clone(),
            weight: record.weight,
            reps: record.reps,
            sets: record.sets,
            estimated_1rm: record.estimated_1rm,
        }
    }
}

/// Roll the log into the CSV archive and empty the log
///
/// Holding the log's exclusive lock throughout, this function:
/// 1. Reads all records from the log
/// 2. Skips records whose id is already in the CSV
/// 3. Appends the rest to the CSV file (headers only when the file is new)
/// 4. Syncs the CSV to disk
/// 5. Appends the raw log to `.wal.processed` and truncates the log
/// 6. Returns the number of records newly archived
///
/// The log is truncated in place rather than renamed. Appenders that opened
/// it before the lock was taken write into the same file once it is released.
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let mut wal = match OpenOptions::new().read(true).write(true).open(wal_path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No workout log to roll up");
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    wal.lock_exclusive()?;
    let result = roll_locked(&mut wal, wal_path, csv_path);
    wal.unlock()?;
    result
}

fn roll_locked(wal: &mut File, wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let mut raw = Vec::new();
    wal.read_to_end(&mut raw)?;

    let records = crate::wal::parse_records(raw.as_slice())?;
    if records.is_empty() {
        tracing::info!("No workouts in log to roll up");
        return Ok(0);
    }

    let archived: HashSet<Uuid> = if csv_path.exists() {
        crate::history::load_records_from_csv(csv_path)?
            .into_iter()
            .map(|r| r.id)
            .collect()
    } else {
        HashSet::new()
    };

    let fresh: Vec<&WorkoutRecord> = records.iter().filter(|r| !archived.contains(&r.id)).collect();
    if fresh.len() < records.len() {
        tracing::info!("Skipping {} workouts already in CSV", records.len() - fresh.len());
    }

    if !fresh.is_empty() {
        append_csv(csv_path, &fresh)?;
        tracing::info!("Wrote {} workouts to CSV", fresh.len());
    }

    let processed_path = wal_path.with_extension("wal.processed");
    let mut processed = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&processed_path)?;
    processed.write_all(&raw)?;
    processed.sync_all()?;

    wal.set_len(0)?;
    wal.sync_all()?;

    tracing::info!("Archived log to {:?}", processed_path);

    Ok(fresh.len())
}

fn append_csv(csv_path: &Path, records: &[&WorkoutRecord]) -> Result<()> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for record in records {
        writer.serialize(CsvRow::from(*record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;
    Ok(())
}

/// Remove archived `.wal.processed` files from a directory
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed log: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed logs", count);
    }

    Ok(count)
}
