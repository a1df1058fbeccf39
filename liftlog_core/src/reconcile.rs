//! Gap reconciliation for days missed since the last log.
//!
//! Every day strictly between the last logged date and today needs an
//! outcome. Decisions are requested one day at a time and applied
//! immediately, so an interrupted run keeps whatever it finished and the
//! next run picks up from there.

use crate::rotation::{advance_state, current_workout};
use crate::store::LogStore;
use crate::types::REST_LABEL;
use crate::{LogStatus, Result, TrackerState};
use chrono::{Duration, NaiveDate};

/// Source of per-day outcomes for missed days
///
/// Returning `None` means no decision is available; backfill stops there.
pub trait DecisionSource {
    fn decide(&mut self, date: NaiveDate, workout: &str) -> Option<LogStatus>;
}

impl<F> DecisionSource for F
where
    F: FnMut(NaiveDate, &str) -> Option<LogStatus>,
{
    fn decide(&mut self, date: NaiveDate, workout: &str) -> Option<LogStatus> {
        self(date, workout)
    }
}

/// Result of a reconciliation pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
    /// Days written, in date order, with the outcome applied
    pub backfilled: Vec<(NaiveDate, LogStatus)>,
    /// Missed days left unprocessed because no decision was available
    pub remaining: usize,
}

impl Reconciliation {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Days strictly between `last` and `today`
pub fn missed_days(last: Option<NaiveDate>, today: NaiveDate) -> Vec<NaiveDate> {
    let Some(last) = last else {
        return Vec::new();
    };
    let gap = (today - last).num_days();
    if gap <= 1 {
        return Vec::new();
    }
    (1..gap).map(|i| last + Duration::days(i)).collect()
}

/// Backfill every missed day between `state.last_log_date` and `today`
///
/// `state` is updated after each written day: position advances on
/// `done`, and `last_log_date` moves to the day just processed (ending at
/// `today - 1` on a full run). If a log write fails the error is returned
/// with `state` reflecting the days already written.
pub fn reconcile_gap<L, D>(
    state: &mut TrackerState,
    today: NaiveDate,
    logs: &mut L,
    decisions: &mut D,
) -> Result<Reconciliation>
where
    L: LogStore + ?Sized,
    D: DecisionSource + ?Sized,
{
    let missed = missed_days(state.last_log_date, today);
    let mut outcome = Reconciliation::default();
    if missed.is_empty() {
        return Ok(outcome);
    }

    tracing::info!("Found {} missed day(s) to reconcile", missed.len());

    for (i, date) in missed.iter().enumerate() {
        let workout = current_workout(&state.cycle, state.position)?.to_string();

        let Some(decision) = decisions.decide(*date, &workout) else {
            outcome.remaining = missed.len() - i;
            tracing::warn!(
                "No decision for {}; stopping backfill with {} day(s) left",
                date,
                outcome.remaining
            );
            break;
        };

        match decision {
            LogStatus::Done => {
                logs.append_log(*date, &workout, LogStatus::Done)?;
                advance_state(state);
            }
            LogStatus::Rest => {
                logs.append_log(*date, REST_LABEL, LogStatus::Rest)?;
            }
            LogStatus::Skip => {
                logs.append_log(*date, &workout, LogStatus::Skip)?;
            }
        }
        state.last_log_date = Some(*date);
        outcome.backfilled.push((*date, decision));
        tracing::debug!("Backfilled {} as {}", date, decision);
    }

    Ok(outcome)
}
