//! Storage contracts used by the tracker.
//!
//! The tracker only needs a singleton state record and an append-only log
//! that can be read back by recency. File-backed implementations live in
//! [`crate::state`] and [`crate::wal`]; the in-memory ones here back tests
//! and embedders that keep their own persistence.

use crate::{LogEntry, LogStatus, Result, TrackerState};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Singleton state record
pub trait StateStore {
    /// Read the state, creating and persisting the default on first access
    fn get_state(&mut self) -> Result<TrackerState>;

    /// Overwrite the stored state
    fn save_state(&mut self, state: &TrackerState) -> Result<()>;
}

/// Append-only log of dated entries
pub trait LogStore {
    /// Append an entry; the store assigns `id` and `created_at`
    fn append_log(
        &mut self,
        date: NaiveDate,
        workout_type: &str,
        status: LogStatus,
    ) -> Result<LogEntry>;

    /// Up to `limit` entries, most recently written first
    fn recent_entries(&self, limit: usize) -> Result<Vec<LogEntry>>;
}

/// State store that keeps the record in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryStateStore {
    state: Option<TrackerState>,
    initial: TrackerState,
    pub saves: usize,
}

impl MemoryStateStore {
    /// Empty store that hands out `initial` on first access
    pub fn new(initial: TrackerState) -> Self {
        Self {
            state: None,
            initial,
            saves: 0,
        }
    }

    /// Store that already holds `state`
    pub fn with_state(state: TrackerState) -> Self {
        Self {
            state: Some(state),
            initial: TrackerState::default(),
            saves: 0,
        }
    }

    /// Stored record, if any
    pub fn stored(&self) -> Option<&TrackerState> {
        self.state.as_ref()
    }
}

impl StateStore for MemoryStateStore {
    fn get_state(&mut self) -> Result<TrackerState> {
        if let Some(state) = &self.state {
            return Ok(state.clone());
        }
        let state = self.initial.clone();
        self.save_state(&state)?;
        Ok(state)
    }

    fn save_state(&mut self, state: &TrackerState) -> Result<()> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Log store that keeps entries in memory, in write order
#[derive(Clone, Debug, Default)]
pub struct MemoryLogStore {
    entries: Vec<LogEntry>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `entries`, oldest write first
    pub fn with_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// All entries in write order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

impl LogStore for MemoryLogStore {
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
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn recent_entries(&self, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self.entries.iter().rev().take(limit).cloned().collect())
    }
}
