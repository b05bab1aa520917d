//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//! The countdown is never decremented per tick; every tick recomputes it from
//! the anchor timestamp, so a suspended process catches up on its next tick.
//!
//! ## State Transitions
//!
//! ```text
//! Work --(complete, n % 4 != 0)--> ShortBreak --(complete)--> Work
//! Work --(complete, n % 4 == 0)--> LongBreak  --(complete)--> Work
//! any  --(change_mode)-----------> any
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let (mut engine, lapsed) = TimerEngine::restore(store, clock, settings);
//! engine.toggle_running();
//! // In a loop:
//! engine.tick(); // Returns Some(Event) when a countdown completes
//! ```

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::mode::{Durations, TimerMode};
use super::session::{compute_remaining, TimerSession};
use crate::clock::{to_datetime, Clock};
use crate::events::Event;
use crate::stats::{StatisticsAggregator, StatsSettings};
use crate::storage::{load_record, save_record, StateKey, StateStore};

/// Engine tunables, usually built from [`Config`](crate::Config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub durations: Durations,
    /// Every n-th completed work interval is followed by a long break.
    pub long_break_interval: u32,
    /// How long a completion notification stays visible.
    pub notification_secs: u32,
    pub stats: StatsSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            long_break_interval: 4,
            notification_secs: 5,
            stats: StatsSettings::default(),
        }
    }
}

/// What the presentation layer shows after a countdown completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub completed_mode: TimerMode,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingNotice {
    completed_mode: TimerMode,
    raised_at_ms: i64,
}

/// Core timer engine.
///
/// Owns the timer state and the statistics aggregator it reports to.
/// Every state change is written through the injected store.
pub struct TimerEngine {
    session: TimerSession,
    settings: EngineSettings,
    stats: StatisticsAggregator,
    store: Rc<dyn StateStore>,
    clock: Rc<dyn Clock>,
    notice: Option<PendingNotice>,
}

impl TimerEngine {
    /// Create an engine with fresh defaults, ignoring any persisted timer state.
    pub fn new(store: Rc<dyn StateStore>, clock: Rc<dyn Clock>, settings: EngineSettings) -> Self {
        let stats = StatisticsAggregator::load(store.clone(), clock.clone(), settings.stats);
        Self {
            session: TimerSession::fresh(&settings.durations),
            settings,
            stats,
            store,
            clock,
            notice: None,
        }
    }

    /// Rehydrate from the store.
    ///
    /// A countdown that was running is resumed with its remaining time
    /// recomputed from the stored anchor. One that ran out while nothing was
    /// watching is completed at its original completion instant, exactly as
    /// a live tick would have done; the returned event reports it.
    pub fn restore(
        store: Rc<dyn StateStore>,
        clock: Rc<dyn Clock>,
        settings: EngineSettings,
    ) -> (Self, Option<Event>) {
        let mut engine = Self::new(store, clock, settings);
        let Some(mut session) = load_record::<TimerSession>(engine.store.as_ref(), StateKey::TimerState)
        else {
            return (engine, None);
        };

        let full = settings.durations.for_mode(session.mode);
        session.time_left = session.time_left.min(full);
        session.initial_time_left = session.initial_time_left.min(full);
        session.last_saved = None;

        let anchor = match (session.is_running, session.anchor_ms) {
            (true, Some(anchor)) => anchor,
            _ => {
                session.is_running = false;
                session.anchor_ms = None;
                session.focus_start_ms = None;
                session.initial_time_left = session.time_left;
                engine.session = session;
                return (engine, None);
            }
        };

        if session.mode.is_break() {
            session.focus_start_ms = None;
        }
        engine.session = session;

        let now = engine.clock.now_ms();
        let remaining = compute_remaining(anchor, engine.session.initial_time_left, now);
        if remaining > 0 {
            tracing::debug!(remaining, mode = ?engine.session.mode, "resumed running timer");
            engine.session.time_left = remaining;
            engine.persist();
            return (engine, None);
        }

        let completed_at = engine.session.completion_instant().unwrap_or(anchor);
        tracing::info!(mode = ?engine.session.mode, "timer completed while away");
        let event = engine.complete(completed_at, true);
        (engine, Some(event))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.session.mode
    }

    /// Seconds left, computed against the clock right now.
    pub fn time_left(&self) -> u32 {
        self.session.remaining_at(self.clock.now_ms())
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running
    }

    /// Completed work intervals.
    pub fn sessions(&self) -> u32 {
        self.session.sessions
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notice.map(|n| Notification {
            completed_mode: n.completed_mode,
            visible: true,
        })
    }

    /// Stopped with nothing left to show; no further ticks are needed.
    pub fn is_idle(&self) -> bool {
        !self.session.is_running && self.notice.is_none()
    }

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn stats(&self) -> &StatisticsAggregator {
        &self.stats
    }

    pub fn total_secs(&self) -> u32 {
        self.settings.durations.for_mode(self.session.mode)
    }

    /// 0.0 .. 100.0 progress through the current countdown.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let done = total.saturating_sub(self.time_left());
        f64::from(done) / f64::from(total) * 100.0
    }

    /// Countdown as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        format_clock(self.time_left())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.session.mode,
            time_left: self.time_left(),
            is_running: self.session.is_running,
            sessions: self.session.sessions,
            total_secs: self.total_secs(),
            progress_pct: self.progress_pct(),
            notification: self.notification(),
            at: to_datetime(self.clock.now_ms()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle_running(&mut self) -> Option<Event> {
        if self.session.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.session.is_running {
            return None;
        }
        let now = self.clock.now_ms();
        self.session.is_running = true;
        self.session.anchor_ms = Some(now);
        self.session.initial_time_left = self.session.time_left;
        self.session.focus_start_ms = (self.session.mode == TimerMode::Work).then_some(now);
        self.persist();
        tracing::debug!(mode = ?self.session.mode, time_left = self.session.time_left, "timer started");
        Some(Event::TimerStarted {
            mode: self.session.mode,
            time_left: self.session.time_left,
            at: to_datetime(now),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.session.is_running {
            return None;
        }
        let now = self.clock.now_ms();
        let remaining = self.session.remaining_at(now);
        if remaining == 0 {
            let completed_at = self.session.completion_instant().unwrap_or(now);
            return Some(self.complete(completed_at, false));
        }

        let focus_secs = self.flush_focus(now, false);
        self.session.accumulated_focus_secs =
            self.session.accumulated_focus_secs.saturating_add(focus_secs);
        self.session.time_left = remaining;
        self.session.initial_time_left = remaining;
        self.session.is_running = false;
        self.session.anchor_ms = None;
        self.persist();
        tracing::debug!(mode = ?self.session.mode, remaining, focus_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.session.mode,
            time_left: remaining,
            focus_secs,
            at: to_datetime(now),
        })
    }

    /// Switch to `mode` with a full countdown. The timer is left stopped.
    pub fn change_mode(&mut self, mode: TimerMode) -> Option<Event> {
        let now = self.clock.now_ms();
        let from = self.session.mode;
        self.flush_focus(now, true);
        let full = self.settings.durations.for_mode(mode);
        self.session.mode = mode;
        self.session.time_left = full;
        self.session.initial_time_left = full;
        self.session.is_running = false;
        self.session.anchor_ms = None;
        self.session.focus_start_ms = None;
        self.session.accumulated_focus_secs = 0;
        self.persist();
        tracing::debug!(?from, to = ?mode, "mode changed");
        Some(Event::ModeChanged {
            from,
            to: mode,
            time_left: full,
            at: to_datetime(now),
        })
    }

    /// Override the countdown. Out-of-range input is clamped to
    /// `0 ..= duration(mode)`. A running countdown is re-anchored at now.
    pub fn set_time_left(&mut self, seconds: i64) -> Option<Event> {
        let full = self.total_secs();
        let clamped = u32::try_from(seconds.clamp(0, i64::from(full))).unwrap_or(full);
        let now = self.override_time_left(clamped);
        Some(Event::TimeLeftSet {
            time_left: clamped,
            at: to_datetime(now),
        })
    }

    /// Restore the current mode's full countdown without changing whether it runs.
    pub fn reset(&mut self) -> Option<Event> {
        let full = self.total_secs();
        let now = self.override_time_left(full);
        Some(Event::TimerReset {
            time_left: full,
            at: to_datetime(now),
        })
    }

    pub fn dismiss_notification(&mut self) -> Option<Event> {
        let notice = self.notice.take()?;
        Some(Event::NotificationCleared {
            completed_mode: notice.completed_mode,
            at: to_datetime(self.clock.now_ms()),
        })
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` when the
    /// countdown reaches zero and `Some(Event::NotificationCleared)` when a
    /// completion notification expires.
    ///
    /// Completion stops the timer, so later ticks cannot fire it again.
    pub fn tick(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();

        if let (true, Some(anchor)) = (self.session.is_running, self.session.anchor_ms) {
            let remaining = compute_remaining(anchor, self.session.initial_time_left, now);
            if remaining == 0 {
                let completed_at = self.session.completion_instant().unwrap_or(now);
                return Some(self.complete(completed_at, false));
            }
            if remaining != self.session.time_left {
                self.session.time_left = remaining;
                self.persist();
            }
        }

        let notice = self.notice?;
        let shown_ms = i64::from(self.settings.notification_secs) * 1000;
        if now.saturating_sub(notice.raised_at_ms) >= shown_ms {
            self.notice = None;
            return Some(Event::NotificationCleared {
                completed_mode: notice.completed_mode,
                at: to_datetime(now),
            });
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Natural completion of the current countdown at `completed_at`.
    fn complete(&mut self, completed_at: i64, while_away: bool) -> Event {
        let completed = self.session.mode;
        let mut focus_secs = 0;

        let next = match completed {
            TimerMode::Work => {
                let segment = self.flush_focus(completed_at, true);
                focus_secs = self.session.accumulated_focus_secs.saturating_add(segment);
                self.session.sessions += 1;
                self.stats.record_completed_work_session();
                if self.session.sessions % self.settings.long_break_interval.max(1) == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                self.stats.record_completed_break(completed);
                TimerMode::Work
            }
        };

        let full = self.settings.durations.for_mode(next);
        self.session.mode = next;
        self.session.time_left = full;
        self.session.initial_time_left = full;
        self.session.is_running = false;
        self.session.anchor_ms = None;
        self.session.focus_start_ms = None;
        self.session.accumulated_focus_secs = 0;
        self.session.unreported_focus_secs = 0;
        self.notice = Some(PendingNotice {
            completed_mode: completed,
            raised_at_ms: self.clock.now_ms(),
        });
        self.persist();

        tracing::info!(?completed, ?next, sessions = self.session.sessions, "countdown completed");
        Event::TimerCompleted {
            completed_mode: completed,
            next_mode: next,
            sessions: self.session.sessions,
            focus_secs,
            while_away,
            at: to_datetime(completed_at),
        }
    }

    /// Close the open focus window at `until_ms` and report it to statistics.
    /// Returns the seconds in the closed window; earlier pauses were reported
    /// when they happened.
    ///
    /// Only whole minutes are reported unless `settle` is set, so short
    /// segments carry their remainder into the next flush instead of being
    /// rounded away one at a time.
    fn flush_focus(&mut self, until_ms: i64, settle: bool) -> u64 {
        let secs = self
            .session
            .focus_start_ms
            .take()
            .map(|start| (until_ms.saturating_sub(start).max(0) / 1000) as u64)
            .unwrap_or(0);
        let owed = self.session.unreported_focus_secs.saturating_add(secs);
        let report = if settle { owed } else { owed / 60 * 60 };
        self.session.unreported_focus_secs = owed - report;
        if report > 0 {
            self.stats.record_focus_time(report);
        }
        secs
    }

    fn override_time_left(&mut self, seconds: u32) -> i64 {
        let now = self.clock.now_ms();
        self.session.time_left = seconds;
        self.session.initial_time_left = seconds;
        if self.session.is_running {
            self.session.anchor_ms = Some(now);
        }
        self.persist();
        now
    }

    fn persist(&mut self) {
        self.session.last_saved = Some(self.clock.now_ms());
        save_record(self.store.as_ref(), StateKey::TimerState, &self.session);
    }
}

/// `MM:SS`, minutes not wrapped at the hour.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
