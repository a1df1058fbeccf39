//! Append-only workout log.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Entries are never rewritten.

use crate::store::LogStore;
use crate::{LogEntry, LogStatus, Result};
use chrono::{NaiveDate, Utc};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// JSONL-based log store with file locking
pub struct JsonlLogStore {
    path: PathBuf,
}

impl JsonlLogStore {
    /// Create a new JSONL log store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a fully formed entry as one JSON line
    pub fn append_entry(&mut self, entry: &LogEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Appended {} {} for {} to log",
            entry.status,
            entry.workout_type,
            entry.date
        );
        Ok(())
    }
}

impl LogStore for JsonlLogStore {
    fn append_log(
        &mut self,
        date: NaiveDate,
        workout_type: &str,
        status: LogStatus,
    ) -> Result<LogEntry> {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            date: date.format("%Y-%m-%d").to_string(),
            workout_type: workout_type.to_string(),
            status,
            created_at: Utc::now(),
        };
        self.append_entry(&entry)?;
        Ok(entry)
    }

    fn recent_entries(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = read_entries(&self.path)?;
        // Later lines first, then a stable sort keeps that order on timestamp ties
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Read all entries from a log file, in write order
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<LogEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse log entry at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} entries from log", entries.len());
    Ok(entries)
}
