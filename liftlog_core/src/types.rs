//! Core domain types for the liftlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Tracker state (rotation cycle, position, rest target)
//! - Log entries and their outcome status
//! - Notifications emitted after state changes

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Rotation used when no state has been stored yet
pub static DEFAULT_CYCLE: Lazy<Vec<String>> =
    Lazy::new(|| vec!["push".into(), "pull".into(), "legs".into()]);

/// Rest days per week used when no state has been stored yet
pub const DEFAULT_REST_DAYS_PER_WEEK: u8 = 2;

/// Upper bound for the weekly rest target
pub const MAX_REST_DAYS_PER_WEEK: u8 = 7;

/// Workout label recorded for rest days
pub const REST_LABEL: &str = "rest";

// ============================================================================
// Log Types
// ============================================================================

/// Outcome recorded for a single day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// The scheduled workout was performed; consumes a rotation step
    Done,
    /// Recovery day; the rotation stays where it is
    Rest,
    /// Missed without resting; the rotation stays where it is
    Skip,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Done => "done",
            LogStatus::Rest => "rest",
            LogStatus::Skip => "skip",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "done" | "d" => Ok(LogStatus::Done),
            "rest" | "r" => Ok(LogStatus::Rest),
            "skip" | "s" => Ok(LogStatus::Skip),
            other => Err(crate::Error::Other(format!("Unknown status: {}", other))),
        }
    }
}

/// A single dated entry in the append-only workout log
///
/// `date` is kept as the raw ISO string so that malformed values written
/// by other tools survive a round trip and can be handled by each reader.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: Uuid,
    pub date: String,
    pub workout_type: String,
    pub status: LogStatus,
    /// Write timestamp assigned by the store; only used for ordering
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    /// Parse the entry's date, returning `None` when it is not an ISO date
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn is_rest(&self) -> bool {
        self.status == LogStatus::Rest || self.workout_type.eq_ignore_ascii_case(REST_LABEL)
    }
}

// ============================================================================
// State Types
// ============================================================================

/// Singleton tracker state persisted between runs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackerState {
    pub cycle: Vec<String>,
    pub position: usize,
    pub last_log_date: Option<NaiveDate>,
    pub rest_days_per_week: u8,
}

impl TrackerState {
    /// Fresh state with the given rotation and rest target
    pub fn new(cycle: Vec<String>, rest_days_per_week: u8) -> Self {
        Self {
            cycle,
            position: 0,
            last_log_date: None,
            rest_days_per_week,
        }
    }

    /// Workout at the current position
    pub fn current_workout(&self) -> crate::Result<&str> {
        crate::rotation::current_workout(&self.cycle, self.position)
    }
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new(DEFAULT_CYCLE.clone(), DEFAULT_REST_DAYS_PER_WEEK)
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Completed state change, reported to the surrounding UI
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A workout was logged as done; `next` is the new current workout
    WorkoutLogged { workout: String, next: String },
    /// Today was logged as rest; `queued` stays the current workout
    RestLogged { queued: String },
    /// The rotation was replaced and the position reset
    CycleUpdated { cycle: Vec<String> },
    /// The weekly rest target changed
    RestTargetUpdated { rest_days_per_week: u8 },
    /// Missed days were backfilled at startup
    Backfilled { days: usize },
}

/// Title-case a workout label for display ("upper body" -> "Upper Body")
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut start_of_word = true;
    for c in label.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}
