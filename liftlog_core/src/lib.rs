#![forbid(unsafe_code)]

//! Core domain model and scheduling logic for the liftlog workout tracker.
//!
//! This crate provides:
//! - Domain types (tracker state, log entries, notifications)
//! - Rotation engine over the workout cycle
//! - History analysis (streaks, weekly rest count)
//! - Week schedule prediction
//! - Gap reconciliation for missed days
//! - Persistence (JSON state document, JSONL log)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod rotation;
pub mod history;
pub mod schedule;
pub mod reconcile;
pub mod store;
pub mod state;
pub mod wal;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use reconcile::{DecisionSource, Reconciliation};
pub use schedule::{predict_week, DayKind, ScheduleDay, WeekSchedule};
pub use state::JsonStateStore;
pub use store::{LogStore, MemoryLogStore, MemoryStateStore, StateStore};
pub use tracker::{FileTracker, Notifier, Summary, Tracker, TracingNotifier};
pub use wal::JsonlLogStore;
