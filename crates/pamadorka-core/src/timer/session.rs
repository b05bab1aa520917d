//! The persisted timer state vector.
//!
//! A [`TimerSession`] is what gets written under `timerState`. It is not a
//! long-lived object so much as the state reconstructed on every load:
//! while running, the displayed countdown is always recomputed from the
//! anchor timestamp rather than trusted from the stored `timeLeft`.

use serde::{Deserialize, Serialize};

use super::mode::{Durations, TimerMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    #[serde(rename = "timerMode")]
    pub mode: TimerMode,
    /// Seconds left on the countdown, never above the mode's duration.
    pub time_left: u32,
    /// Completed work intervals.
    pub sessions: u32,
    pub is_running: bool,
    /// Epoch ms at which the current run was (re)started.
    #[serde(rename = "timerStartTime", default)]
    pub anchor_ms: Option<i64>,
    /// `time_left` frozen at the anchor.
    #[serde(rename = "initialTimeLeft")]
    pub initial_time_left: u32,
    /// Epoch ms at which the current uninterrupted focus window began.
    #[serde(rename = "sessionStartTime", default)]
    pub focus_start_ms: Option<i64>,
    /// Focus seconds already banked for the in-progress work interval.
    #[serde(rename = "accumulatedFocusTime", default)]
    pub accumulated_focus_secs: u64,
    /// Focus seconds paused before they made up a whole minute; reported
    /// with the next flush.
    #[serde(rename = "unreportedFocusTime", default)]
    pub unreported_focus_secs: u64,
    #[serde(default)]
    pub last_saved: Option<i64>,
}

impl TimerSession {
    /// Idle work interval with a full countdown.
    pub fn fresh(durations: &Durations) -> Self {
        Self {
            mode: TimerMode::Work,
            time_left: durations.work,
            sessions: 0,
            is_running: false,
            anchor_ms: None,
            initial_time_left: durations.work,
            focus_start_ms: None,
            accumulated_focus_secs: 0,
            unreported_focus_secs: 0,
            last_saved: None,
        }
    }

    /// Countdown value at `now_ms`.
    pub fn remaining_at(&self, now_ms: i64) -> u32 {
        match (self.is_running, self.anchor_ms) {
            (true, Some(anchor)) => compute_remaining(anchor, self.initial_time_left, now_ms),
            _ => self.time_left,
        }
    }

    /// Instant at which the current run reaches zero, if running.
    pub fn completion_instant(&self) -> Option<i64> {
        match (self.is_running, self.anchor_ms) {
            (true, Some(anchor)) => {
                Some(anchor.saturating_add(i64::from(self.initial_time_left) * 1000))
            }
            _ => None,
        }
    }
}

/// Seconds left on a countdown that started at `anchor_ms` with
/// `initial_secs` remaining: `max(0, initial - floor(elapsed / 1000))`.
///
/// A clock that reads earlier than the anchor counts as no time elapsed.
/// Anchors at the edges of the `i64` range saturate instead of overflowing.
pub fn compute_remaining(anchor_ms: i64, initial_secs: u32, now_ms: i64) -> u32 {
    let elapsed_secs = now_ms.saturating_sub(anchor_ms).max(0) / 1000;
    let elapsed_secs = u32::try_from(elapsed_secs).unwrap_or(u32::MAX);
    initial_secs.saturating_sub(elapsed_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn remaining_floors_partial_seconds() {
        assert_eq!(compute_remaining(0, 100, 999), 100);
        assert_eq!(compute_remaining(0, 100, 1_000), 99);
        assert_eq!(compute_remaining(0, 100, 1_999), 99);
    }

    #[test]
    fn remaining_clamps_at_zero() {
        assert_eq!(compute_remaining(0, 100, 150_000), 0);
    }

    #[test]
    fn clock_going_backwards_is_no_elapsed_time() {
        assert_eq!(compute_remaining(10_000, 60, 5_000), 60);
    }

    #[test]
    fn remaining_saturates_at_range_edges() {
        assert_eq!(compute_remaining(i64::MIN, 100, 1_000), 0);
        assert_eq!(compute_remaining(i64::MAX, 100, -1_000), 100);

        let mut s = TimerSession::fresh(&Durations::default());
        s.is_running = true;
        s.anchor_ms = Some(i64::MAX);
        assert_eq!(s.completion_instant(), Some(i64::MAX));
    }

    #[test]
    fn stopped_session_reports_stored_value() {
        let mut s = TimerSession::fresh(&Durations::default());
        s.time_left = 42;
        assert_eq!(s.remaining_at(i64::MAX / 2), 42);
        assert!(s.completion_instant().is_none());
    }

    #[test]
    fn persisted_field_names() {
        let mut s = TimerSession::fresh(&Durations::default());
        s.is_running = true;
        s.anchor_ms = Some(1_700_000_000_000);
        let json = serde_json::to_value(&s).unwrap();
        for key in [
            "timerMode",
            "timeLeft",
            "sessions",
            "isRunning",
            "timerStartTime",
            "initialTimeLeft",
            "sessionStartTime",
            "accumulatedFocusTime",
            "unreportedFocusTime",
            "lastSaved",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["timerMode"], "work");
        assert_eq!(json["sessionStartTime"], serde_json::Value::Null);
    }

    #[test]
    fn negative_time_left_fails_to_parse() {
        let raw = r#"{"timerMode":"work","timeLeft":-5,"sessions":0,"isRunning":false,"initialTimeLeft":0}"#;
        assert!(serde_json::from_str::<TimerSession>(raw).is_err());
    }

    proptest! {
        #[test]
        fn remaining_matches_closed_form(
            initial in 0u32..100_000,
            anchor in 0i64..4_000_000_000_000,
            elapsed in 0i64..200_000_000,
        ) {
            let expected = (i64::from(initial) - elapsed / 1000).max(0) as u32;
            prop_assert_eq!(compute_remaining(anchor, initial, anchor + elapsed), expected);
        }

        #[test]
        fn serialization_preserves_derived_remaining(
            initial in 1u32..5_000,
            anchor in 0i64..4_000_000_000_000,
            elapsed in 0i64..10_000_000,
        ) {
            let mut s = TimerSession::fresh(&Durations::default());
            s.is_running = true;
            s.anchor_ms = Some(anchor);
            s.initial_time_left = initial;
            let now = anchor + elapsed;
            let json = serde_json::to_string(&s).unwrap();
            let back: TimerSession = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back.remaining_at(now), s.remaining_at(now));
        }
    }
}
