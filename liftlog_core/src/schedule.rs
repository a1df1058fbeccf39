//! Week predictor: Monday..Sunday view mixing logged and predicted days.
//!
//! Logged days show what actually happened. Unlogged days from today on
//! are filled by walking the rotation forward, with the remaining weekly
//! rest quota spread evenly across them.

use crate::history::{logged_today, monday_of, rest_days_this_week};
use crate::rotation::{advance, current_workout, retreat};
use crate::types::title_case;
use crate::{LogEntry, LogStatus, Result, TrackerState};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// What a single day of the week shows
#[derive(Clone, Debug, PartialEq)]
pub enum DayKind {
    /// An entry exists for this date
    Logged {
        workout_type: String,
        status: LogStatus,
    },
    /// Past day with no entry; nothing is predicted for it
    Unfilled,
    /// Future day reserved for rest
    PredictedRest,
    /// Future day predicted to carry this rotation workout
    Predicted(String),
}

/// One line of the weekly schedule
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub kind: DayKind,
    pub is_today: bool,
}

impl ScheduleDay {
    /// Render as a display line, e.g. `  Wed  ·  Legs  ←`
    pub fn line(&self) -> String {
        let day_label = self.date.format("%a");
        let mut line = match &self.kind {
            DayKind::Logged {
                workout_type,
                status,
            } => {
                let mark = if *status == LogStatus::Done { "+" } else { "-" };
                format!("  {}  {}  {}", day_label, mark, title_case(workout_type))
            }
            DayKind::Unfilled => format!("  {}  ·  —", day_label),
            DayKind::PredictedRest => format!("  {}  ·  Rest", day_label),
            DayKind::Predicted(workout) => {
                format!("  {}  ·  {}", day_label, title_case(workout))
            }
        };
        if self.is_today {
            line.push_str("  ←");
        }
        line
    }
}

/// The current week's schedule plus the rest-day tally
#[derive(Clone, Debug, PartialEq)]
pub struct WeekSchedule {
    pub monday: NaiveDate,
    pub days: Vec<ScheduleDay>,
    pub rest_taken: u32,
    pub rest_target: u8,
}

impl WeekSchedule {
    /// Heading such as "Week of Mar 4"
    pub fn title(&self) -> String {
        format!("Week of {}", self.monday.format("%b %-d"))
    }

    /// Trailing rest-day tally
    pub fn summary_line(&self) -> String {
        format!("  Rest days: {}/{}", self.rest_taken, self.rest_target)
    }

    /// Seven day lines, a blank separator and the summary
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.days.iter().map(ScheduleDay::line).collect();
        lines.push(String::new());
        lines.push(self.summary_line());
        lines
    }
}

impl fmt::Display for WeekSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Pick which of `unlogged` open slots become rest days
///
/// Returns positions into the open-slot list. The k-th rest day lands at
/// `round(unlogged / rest_remaining * k) - 1` with ties rounded to even,
/// capped at the last slot; a result of -1 also selects the last slot.
/// Colliding picks collapse, so fewer rest days than requested may come
/// back.
pub fn spread_rest_slots(unlogged: usize, rest_remaining: usize) -> BTreeSet<usize> {
    let mut picked = BTreeSet::new();
    if unlogged == 0 || rest_remaining == 0 {
        return picked;
    }

    let last = unlogged - 1;
    let step = unlogged as f64 / rest_remaining as f64;
    for k in 1..=rest_remaining {
        let idx = (step * k as f64).round_ties_even() as i64 - 1;
        let idx = if idx < 0 { last } else { (idx as usize).min(last) };
        picked.insert(idx);
    }
    picked
}

/// Build the Monday..Sunday schedule for the week containing `today`
///
/// `entries` are recent log entries in store order (newest write first).
pub fn predict_week(
    state: &TrackerState,
    entries: &[LogEntry],
    today: NaiveDate,
) -> Result<WeekSchedule> {
    // Validates the cycle up front so the walk below can index freely
    current_workout(&state.cycle, state.position)?;
    let cycle_len = state.cycle.len();

    let monday = monday_of(today);
    let week: Vec<NaiveDate> = (0..7).map(|i| monday + Duration::days(i)).collect();

    // First entry per date wins; malformed dates simply never match a day
    let mut logged: HashMap<&str, &LogEntry> = HashMap::new();
    for entry in entries {
        logged.entry(entry.date.as_str()).or_insert(entry);
    }
    let key = |d: &NaiveDate| d.format("%Y-%m-%d").to_string();

    let unlogged: Vec<usize> = week
        .iter()
        .enumerate()
        .filter(|(_, d)| **d >= today && !logged.contains_key(key(*d).as_str()))
        .map(|(i, _)| i)
        .collect();

    let rest_taken = rest_days_this_week(entries, today);
    let rest_remaining = u32::from(state.rest_days_per_week).saturating_sub(rest_taken) as usize;
    let rest_days: BTreeSet<usize> = spread_rest_slots(unlogged.len(), rest_remaining)
        .into_iter()
        .map(|slot| unlogged[slot])
        .collect();

    tracing::debug!(
        "Predicting week of {}: {} open days, {} rest remaining",
        monday,
        unlogged.len(),
        rest_remaining
    );

    // Position already reflects today's advance once today is logged
    let mut cursor = if logged_today(state, today) {
        retreat(state.position, cycle_len)
    } else {
        state.position % cycle_len
    };

    let mut days = Vec::with_capacity(7);
    for (i, date) in week.into_iter().enumerate() {
        let kind = if let Some(entry) = logged.get(key(&date).as_str()) {
            if entry.status == LogStatus::Done {
                cursor = advance(cursor, cycle_len);
            }
            DayKind::Logged {
                workout_type: entry.workout_type.clone(),
                status: entry.status,
            }
        } else if date < today {
            DayKind::Unfilled
        } else if rest_days.contains(&i) {
            DayKind::PredictedRest
        } else {
            let workout = state.cycle[cursor].clone();
            cursor = advance(cursor, cycle_len);
            DayKind::Predicted(workout)
        };

        days.push(ScheduleDay {
            date,
            kind,
            is_today: date == today,
        });
    }

    Ok(WeekSchedule {
        monday,
        days,
        rest_taken,
        rest_target: state.rest_days_per_week,
    })
}
