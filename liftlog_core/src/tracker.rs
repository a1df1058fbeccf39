//! Tracker service: the user actions of the workout tracker.
//!
//! A [`Tracker`] owns the state and log stores plus a notifier, and keeps
//! a cached copy of the [`TrackerState`]. Every mutation is applied to a
//! copy, persisted, and only then committed to the cache, so a failed save
//! never leaves memory ahead of the store.

use crate::history::{logged_today, rest_days_this_week, streak};
use crate::reconcile::{reconcile_gap, DecisionSource, Reconciliation};
use crate::rotation::{advance_state, set_cycle, set_rest_target};
use crate::schedule::{predict_week, WeekSchedule};
use crate::state::JsonStateStore;
use crate::store::{LogStore, StateStore};
use crate::types::REST_LABEL;
use crate::wal::JsonlLogStore;
use crate::{Config, LogEntry, LogStatus, Notification, Result, TrackerState};
use chrono::NaiveDate;
use std::path::Path;

/// File name of the state document inside the data directory
pub const STATE_FILE: &str = "state.json";

/// File name of the workout log inside the data directory
pub const LOG_FILE: &str = "log.jsonl";

/// Receiver for completed state changes
///
/// Purely observational; nothing it does affects the tracker.
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

impl<F> Notifier for F
where
    F: Fn(&Notification),
{
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}

/// Notifier that only records changes in the trace log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!("{:?}", notification);
    }
}

/// Snapshot of everything the status view shows
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub today: NaiveDate,
    pub current_workout: String,
    /// Most recent entry, present only once today is logged
    pub today_entry: Option<LogEntry>,
    pub streak: u32,
    pub rest_taken: u32,
    pub rest_target: u8,
    pub cycle: Vec<String>,
    pub position: usize,
}

impl Summary {
    pub fn logged_today(&self) -> bool {
        self.today_entry.is_some()
    }
}

/// Tracker backed by files in a data directory
pub type FileTracker<N> = Tracker<JsonStateStore, JsonlLogStore, N>;

pub struct Tracker<S, L, N> {
    states: S,
    logs: L,
    notifier: N,
    state: TrackerState,
    history_window: usize,
    week_window: usize,
}

impl<N: Notifier> FileTracker<N> {
    /// Open the tracker stored under `data_dir`
    pub fn open_in(data_dir: &Path, config: &Config, notifier: N) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let states = JsonStateStore::new(data_dir.join(STATE_FILE), config.initial_state());
        let logs = JsonlLogStore::new(data_dir.join(LOG_FILE));
        Ok(Tracker::open(states, logs, notifier)?
            .with_windows(config.tracker.history_window, config.tracker.week_window))
    }
}

impl<S, L, N> Tracker<S, L, N>
where
    S: StateStore,
    L: LogStore,
    N: Notifier,
{
    /// Load (or create) the state and wrap the stores
    pub fn open(mut states: S, logs: L, notifier: N) -> Result<Self> {
        let state = states.get_state()?;
        tracing::debug!(
            "Opened tracker at position {} of {:?}",
            state.position,
            state.cycle
        );
        Ok(Self {
            states,
            logs,
            notifier,
            state,
            history_window: 60,
            week_window: 30,
        })
    }

    /// Override how many recent entries the streak and week views read
    pub fn with_windows(mut self, history_window: usize, week_window: usize) -> Self {
        self.history_window = history_window;
        self.week_window = week_window;
        self
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn state_store(&self) -> &S {
        &self.states
    }

    pub fn log_store(&self) -> &L {
        &self.logs
    }

    pub fn current_workout(&self) -> Result<&str> {
        self.state.current_workout()
    }

    pub fn logged_today(&self, today: NaiveDate) -> bool {
        logged_today(&self.state, today)
    }

    /// Whether a log for `today` (or a later date) is already recorded
    ///
    /// A date earlier than the stored one counts as logged so that
    /// `last_log_date` never moves backwards.
    fn already_logged(&self, today: NaiveDate) -> bool {
        self.state.last_log_date.is_some_and(|last| last >= today)
    }

    fn commit(&mut self, next: TrackerState) -> Result<()> {
        self.states.save_state(&next)?;
        self.state = next;
        Ok(())
    }

    /// Log today's workout as done and advance the rotation
    ///
    /// Returns `None` without writing anything if today, or a later day, is
    /// already logged.
    pub fn mark_done(&mut self, today: NaiveDate) -> Result<Option<LogEntry>> {
        if self.already_logged(today) {
            tracing::info!("Already logged {}, ignoring done", today);
            return Ok(None);
        }

        let workout = self.current_workout()?.to_string();
        let entry = self.logs.append_log(today, &workout, LogStatus::Done)?;

        let mut next = self.state.clone();
        advance_state(&mut next);
        next.last_log_date = Some(today);
        self.commit(next)?;

        tracing::info!("Logged {} as done on {}", workout, today);
        self.notifier.notify(&Notification::WorkoutLogged {
            workout,
            next: self.current_workout()?.to_string(),
        });
        Ok(Some(entry))
    }

    /// Log today as a rest day; the current workout stays queued
    ///
    /// Returns `None` without writing anything if today, or a later day, is
    /// already logged.
    pub fn mark_rest(&mut self, today: NaiveDate) -> Result<Option<LogEntry>> {
        if self.already_logged(today) {
            tracing::info!("Already logged {}, ignoring rest", today);
            return Ok(None);
        }

        let queued = self.current_workout()?.to_string();
        let entry = self.logs.append_log(today, REST_LABEL, LogStatus::Rest)?;

        let mut next = self.state.clone();
        next.last_log_date = Some(today);
        self.commit(next)?;

        tracing::info!("Logged rest on {}, {} stays queued", today, queued);
        self.notifier.notify(&Notification::RestLogged { queued });
        Ok(Some(entry))
    }

    /// Replace the rotation; `false` if no usable label was given
    pub fn edit_cycle<T: AsRef<str>>(&mut self, labels: &[T]) -> Result<bool> {
        let mut next = self.state.clone();
        if !set_cycle(&mut next, labels) {
            return Ok(false);
        }
        self.commit(next)?;

        self.notifier.notify(&Notification::CycleUpdated {
            cycle: self.state.cycle.clone(),
        });
        Ok(true)
    }

    /// Change the weekly rest target; `false` if `n` is outside `0..=7`
    pub fn edit_rest_target(&mut self, n: i64) -> Result<bool> {
        let mut next = self.state.clone();
        if !set_rest_target(&mut next, n) {
            return Ok(false);
        }
        self.commit(next)?;

        self.notifier.notify(&Notification::RestTargetUpdated {
            rest_days_per_week: self.state.rest_days_per_week,
        });
        Ok(true)
    }

    /// Backfill days missed since the last log
    ///
    /// Whatever was processed is persisted, including when a decision was
    /// unavailable or a log write failed part way.
    pub fn reconcile<D>(&mut self, today: NaiveDate, decisions: &mut D) -> Result<Reconciliation>
    where
        D: DecisionSource + ?Sized,
    {
        let mut next = self.state.clone();
        let result = reconcile_gap(&mut next, today, &mut self.logs, decisions);
        if let Err(e) = &result {
            tracing::error!("Backfill stopped after a failed log write: {}", e);
        }

        if next != self.state {
            if let Err(save_err) = self.commit(next) {
                tracing::error!("Failed to save backfill progress: {}", save_err);
                // The log write failure is the root cause when both fail
                result?;
                return Err(save_err);
            }
        }

        let outcome = result?;
        if !outcome.backfilled.is_empty() {
            self.notifier.notify(&Notification::Backfilled {
                days: outcome.backfilled.len(),
            });
        }
        Ok(outcome)
    }

    /// Consecutive done days ending today
    pub fn streak(&self, today: NaiveDate) -> Result<u32> {
        let entries = self.logs.recent_entries(self.history_window)?;
        Ok(streak(&entries, today))
    }

    /// Rest days logged this week so far
    pub fn rest_days_this_week(&self, today: NaiveDate) -> Result<u32> {
        let entries = self.logs.recent_entries(self.week_window)?;
        Ok(rest_days_this_week(&entries, today))
    }

    /// Monday..Sunday schedule for the current week
    pub fn week_schedule(&self, today: NaiveDate) -> Result<WeekSchedule> {
        let entries = self.logs.recent_entries(self.week_window)?;
        predict_week(&self.state, &entries, today)
    }

    /// Most recent log entries, newest write first
    pub fn history(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.logs.recent_entries(limit)
    }

    pub fn summary(&self, today: NaiveDate) -> Result<Summary> {
        let today_entry = if self.logged_today(today) {
            self.logs.recent_entries(1)?.into_iter().next()
        } else {
            None
        };

        Ok(Summary {
            today,
            current_workout: self.current_workout()?.to_string(),
            today_entry,
            streak: self.streak(today)?,
            rest_taken: self.rest_days_this_week(today)?,
            rest_target: self.state.rest_days_per_week,
            cycle: self.state.cycle.clone(),
            position: self.state.position % self.state.cycle.len().max(1),
        })
    }
}
