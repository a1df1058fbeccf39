//! History analysis over the workout log.
//!
//! Streak length and weekly rest counts are derived from recent log
//! entries as delivered by the store (most recent first).

use crate::{LogEntry, LogStatus, TrackerState};
use chrono::{Datelike, Duration, NaiveDate};

/// Monday of the ISO week containing `day`
pub fn monday_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Whether the state records a log write for `today`
pub fn logged_today(state: &TrackerState, today: NaiveDate) -> bool {
    state.last_log_date == Some(today)
}

/// Count consecutive `done` days ending today
///
/// Entries are walked newest first against an expected date that starts at
/// `today` and steps back one day per entry. An unparsable date or a date
/// that does not match the expected one ends the scan. A rest or skip entry
/// on the expected date keeps the scan going without adding to the count.
pub fn streak(entries: &[LogEntry], today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut expected = today;

    for entry in entries {
        let Some(date) = entry.parsed_date() else {
            tracing::debug!("Streak scan stopped at malformed date {:?}", entry.date);
            break;
        };
        if date != expected {
            break;
        }
        if entry.status == LogStatus::Done {
            count += 1;
        }
        expected -= Duration::days(1);
    }

    count
}

/// Count rest entries dated within Monday..=today of the current week
pub fn rest_days_this_week(entries: &[LogEntry], today: NaiveDate) -> u32 {
    let monday = monday_of(today);
    entries
        .iter()
        .filter(|e| e.status == LogStatus::Rest)
        .filter_map(|e| e.parsed_date())
        .filter(|d| (monday..=today).contains(d))
        .count() as u32
}
