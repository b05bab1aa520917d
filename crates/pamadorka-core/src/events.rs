//! Events emitted by the timer engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Notification, TimerMode};

/// Every state change of the timer produces an Event.
/// The presentation layer renders them; nothing in the engine consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        time_left: u32,
        /// Focus seconds in the segment this pause closed.
        focus_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero.
    TimerCompleted {
        completed_mode: TimerMode,
        next_mode: TimerMode,
        sessions: u32,
        /// Total focus seconds of the interval that just completed.
        focus_secs: u64,
        /// The countdown ran out while nothing was observing it.
        while_away: bool,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: TimerMode,
        to: TimerMode,
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimeLeftSet {
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        time_left: u32,
        at: DateTime<Utc>,
    },
    NotificationCleared {
        completed_mode: TimerMode,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        time_left: u32,
        is_running: bool,
        sessions: u32,
        total_secs: u32,
        progress_pct: f64,
        notification: Option<Notification>,
        at: DateTime<Utc>,
    },
}
