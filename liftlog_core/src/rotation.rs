//! Rotation engine: cyclic position over the workout cycle.
//!
//! Position only moves forward on a confirmed `done` day. Rest and skip
//! days leave it where it is.

use crate::types::MAX_REST_DAYS_PER_WEEK;
use crate::{Error, Result, TrackerState};

/// Workout label at `position`, wrapping around the cycle
pub fn current_workout(cycle: &[String], position: usize) -> Result<&str> {
    if cycle.is_empty() {
        return Err(Error::EmptyCycle);
    }
    Ok(&cycle[position % cycle.len()])
}

/// Position after one completed workout
pub fn advance(position: usize, cycle_len: usize) -> usize {
    if cycle_len == 0 {
        return 0;
    }
    (position + 1) % cycle_len
}

/// Position one step behind `position`
pub fn retreat(position: usize, cycle_len: usize) -> usize {
    if cycle_len == 0 {
        return 0;
    }
    (position % cycle_len + cycle_len - 1) % cycle_len
}

/// Trim, lower-case and drop blank labels
pub fn normalize_cycle<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.as_ref().trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Split comma-separated input ("push, pull, legs") into normalized labels
pub fn parse_cycle(input: &str) -> Vec<String> {
    let parts: Vec<&str> = input.split(',').collect();
    normalize_cycle(&parts)
}

/// Replace the rotation and reset the position to the start
///
/// Returns `false` and leaves the state untouched when no label survives
/// normalization.
pub fn set_cycle<S: AsRef<str>>(state: &mut TrackerState, labels: &[S]) -> bool {
    let cycle = normalize_cycle(labels);
    if cycle.is_empty() {
        tracing::debug!("Rejected empty cycle");
        return false;
    }
    tracing::info!("Cycle set to {:?}, position reset", cycle);
    state.cycle = cycle;
    state.position = 0;
    true
}

/// Set the weekly rest target if it is within `0..=7`
pub fn set_rest_target(state: &mut TrackerState, n: i64) -> bool {
    match u8::try_from(n) {
        Ok(n) if n <= MAX_REST_DAYS_PER_WEEK => {
            state.rest_days_per_week = n;
            true
        }
        _ => {
            tracing::debug!("Rejected rest target {}", n);
            false
        }
    }
}

/// Parse free-form rest target input; non-integers yield `None`
pub fn parse_rest_target(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// Advance the state's position after a `done` day
pub(crate) fn advance_state(state: &mut TrackerState) {
    state.position = advance(state.position, state.cycle.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ppl() -> Vec<String> {
        vec!["push".into(), "pull".into(), "legs".into()]
    }

    #[test]
    fn test_current_workout_wraps() {
        let cycle = ppl();
        assert_eq!(current_workout(&cycle, 0).unwrap(), "push");
        assert_eq!(current_workout(&cycle, 2).unwrap(), "legs");
        assert_eq!(current_workout(&cycle, 4).unwrap(), "pull");
    }

    #[test]
    fn test_current_workout_empty_cycle() {
        let cycle: Vec<String> = vec![];
        assert!(matches!(current_workout(&cycle, 0), Err(Error::EmptyCycle)));
    }

    #[test]
    fn test_position_after_k_dones() {
        let mut state = TrackerState::default();
        for k in 1..=10 {
            advance_state(&mut state);
            assert_eq!(state.position, k % 3);
        }
    }

    #[test]
    fn test_retreat() {
        assert_eq!(retreat(0, 3), 2);
        assert_eq!(retreat(1, 3), 0);
        assert_eq!(retreat(5, 3), 1);
    }

    #[test]
    fn test_set_cycle_resets_position() {
        let mut state = TrackerState::default();
        state.position = 2;

        assert!(set_cycle(&mut state, &["a", "b"]));
        assert_eq!(state.cycle, vec!["a", "b"]);
        assert_eq!(state.position, 0);
    }

    #[test]
    fn test_set_cycle_rejects_blank_input() {
        let mut state = TrackerState::default();
        state.position = 1;

        assert!(!set_cycle(&mut state, &["  ", ""]));
        assert_eq!(state.cycle, ppl());
        assert_eq!(state.position, 1);
    }

    #[test]
    fn test_parse_cycle() {
        assert_eq!(
            parse_cycle(" Push, PULL ,, legs "),
            vec!["push", "pull", "legs"]
        );
        assert!(parse_cycle(" , ").is_empty());
    }

    #[test]
    fn test_set_rest_target_bounds() {
        let mut state = TrackerState::default();
        assert!(set_rest_target(&mut state, 0));
        assert_eq!(state.rest_days_per_week, 0);
        assert!(set_rest_target(&mut state, 7));
        assert_eq!(state.rest_days_per_week, 7);

        assert!(!set_rest_target(&mut state, 8));
        assert!(!set_rest_target(&mut state, -1));
        assert_eq!(state.rest_days_per_week, 7);
    }

    #[test]
    fn test_parse_rest_target() {
        assert_eq!(parse_rest_target(" 3 "), Some(3));
        assert_eq!(parse_rest_target("2.5"), None);
        assert_eq!(parse_rest_target("two"), None);
    }
}
