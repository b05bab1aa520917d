//! Focus-time and session rollups fed by the timer engine.
//!
//! ## Streaks
//!
//! A day becomes active once its focus total reaches the threshold. The
//! streak counter only moves at the moment a day crosses that threshold:
//! it continues if yesterday was active and restarts at 1 otherwise. It is
//! never recomputed from history, so missed days are only noticed by the
//! next crossing.

use std::rc::Rc;

use chrono::{Duration, NaiveDate};

use super::snapshot::StatisticsSnapshot;
use crate::clock::Clock;
use crate::storage::{load_record, save_record, StateKey, StateStore};
use crate::timer::TimerMode;

/// Tunables for the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSettings {
    pub streak_threshold_minutes: u32,
    pub retention_days: u32,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            streak_threshold_minutes: 5,
            retention_days: 30,
        }
    }
}

pub struct StatisticsAggregator {
    /// `None` until the first write.
    snapshot: Option<StatisticsSnapshot>,
    settings: StatsSettings,
    store: Rc<dyn StateStore>,
    clock: Rc<dyn Clock>,
}

impl StatisticsAggregator {
    /// Load the persisted snapshot, if any.
    pub fn load(store: Rc<dyn StateStore>, clock: Rc<dyn Clock>, settings: StatsSettings) -> Self {
        let snapshot = load_record::<StatisticsSnapshot>(store.as_ref(), StateKey::Statistics)
            .map(|mut snap| {
                snap.normalize();
                snap
            });
        Self {
            snapshot,
            settings,
            store,
            clock,
        }
    }

    pub fn settings(&self) -> &StatsSettings {
        &self.settings
    }

    /// The stored snapshot, `None` before any completion was recorded.
    pub fn snapshot(&self) -> Option<&StatisticsSnapshot> {
        self.snapshot.as_ref()
    }

    /// The snapshot as of today, with `todays_sessions` re-derived.
    pub fn current(&self) -> StatisticsSnapshot {
        let mut snap = self.snapshot.clone().unwrap_or_default();
        snap.todays_sessions = self.todays_sessions();
        snap
    }

    /// Work sessions completed today. A stored count from an earlier day reads as 0.
    pub fn todays_sessions(&self) -> u32 {
        let today = self.clock.today();
        self.snapshot
            .as_ref()
            .and_then(|s| s.day(today))
            .map(|d| d.work_sessions_completed)
            .unwrap_or(0)
    }

    /// Bank focus time, rounded to whole minutes.
    pub fn record_focus_time(&mut self, seconds: u64) {
        let minutes = seconds.saturating_add(30) / 60;
        let threshold = u64::from(self.settings.streak_threshold_minutes);
        self.write(|snap, today| {
            snap.total_focus_minutes = snap.total_focus_minutes.saturating_add(minutes);

            let day = snap.day_mut(today);
            let before = day.total_focus_minutes;
            day.total_focus_minutes = day.total_focus_minutes.saturating_add(minutes);
            let after = day.total_focus_minutes;

            if before < threshold && after >= threshold {
                let yesterday_active = snap
                    .day(today - Duration::days(1))
                    .is_some_and(|d| d.total_focus_minutes >= threshold);
                snap.current_streak_days = if yesterday_active {
                    snap.current_streak_days + 1
                } else {
                    1
                };
                snap.longest_streak_days = snap.longest_streak_days.max(snap.current_streak_days);
                tracing::debug!(streak = snap.current_streak_days, "day became active");
            }
        });
    }

    pub fn record_completed_work_session(&mut self) {
        self.write(|snap, today| {
            snap.total_sessions += 1;
            snap.day_mut(today).work_sessions_completed += 1;
        });
    }

    /// Count a completed break. Work completions are ignored here.
    pub fn record_completed_break(&mut self, mode: TimerMode) {
        self.write(|snap, today| {
            let day = snap.day_mut(today);
            match mode {
                TimerMode::ShortBreak => day.short_breaks_completed += 1,
                TimerMode::LongBreak => day.long_breaks_completed += 1,
                TimerMode::Work => {}
            }
        });
    }

    fn write(&mut self, apply: impl FnOnce(&mut StatisticsSnapshot, NaiveDate)) {
        let today = self.clock.today();
        let snap = self.snapshot.get_or_insert_with(StatisticsSnapshot::default);
        apply(snap, today);
        snap.todays_sessions = snap.day(today).map(|d| d.work_sessions_completed).unwrap_or(0);
        snap.prune(today, self.settings.retention_days);
        save_record(self.store.as_ref(), StateKey::Statistics, snap);
    }
}
