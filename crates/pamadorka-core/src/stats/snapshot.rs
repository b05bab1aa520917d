//! The persisted `statistics` record.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per-calendar-day counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    /// Serialized as `yyyy-mm-dd`.
    pub date: NaiveDate,
    #[serde(rename = "workSessions", default)]
    pub work_sessions_completed: u32,
    #[serde(rename = "totalFocusTime", default)]
    pub total_focus_minutes: u64,
    #[serde(rename = "shortBreaks", default)]
    pub short_breaks_completed: u32,
    #[serde(rename = "longBreaks", default)]
    pub long_breaks_completed: u32,
}

impl DailyStat {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            work_sessions_completed: 0,
            total_focus_minutes: 0,
            short_breaks_completed: 0,
            long_breaks_completed: 0,
        }
    }
}

/// Process-wide statistics rollup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatisticsSnapshot {
    pub total_sessions: u64,
    #[serde(rename = "totalFocusTime")]
    pub total_focus_minutes: u64,
    #[serde(rename = "currentStreak")]
    pub current_streak_days: u32,
    #[serde(rename = "longestStreak")]
    pub longest_streak_days: u32,
    pub todays_sessions: u32,
    /// Ordered by date, oldest first.
    #[serde(rename = "weeklyData")]
    pub daily_history: Vec<DailyStat>,
}

impl StatisticsSnapshot {
    pub fn day(&self, date: NaiveDate) -> Option<&DailyStat> {
        self.daily_history
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|idx| &self.daily_history[idx])
    }

    /// The record for `date`, inserted in date order if absent.
    pub fn day_mut(&mut self, date: NaiveDate) -> &mut DailyStat {
        let idx = match self.daily_history.binary_search_by_key(&date, |d| d.date) {
            Ok(idx) => idx,
            Err(idx) => {
                self.daily_history.insert(idx, DailyStat::new(date));
                idx
            }
        };
        &mut self.daily_history[idx]
    }

    /// Drop days more than `retention_days` before `today`.
    pub fn prune(&mut self, today: NaiveDate, retention_days: u32) {
        let cutoff = today - Duration::days(i64::from(retention_days));
        self.daily_history.retain(|d| d.date >= cutoff);
    }

    /// Restore date order after loading a hand-edited or legacy record.
    pub(crate) fn normalize(&mut self) {
        self.daily_history.sort_by_key(|d| d.date);
        self.daily_history.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                earlier.work_sessions_completed += later.work_sessions_completed;
                earlier.total_focus_minutes += later.total_focus_minutes;
                earlier.short_breaks_completed += later.short_breaks_completed;
                earlier.long_breaks_completed += later.long_breaks_completed;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_mut_keeps_history_sorted() {
        let mut snap = StatisticsSnapshot::default();
        snap.day_mut(date(2024, 5, 3)).work_sessions_completed = 1;
        snap.day_mut(date(2024, 5, 1)).work_sessions_completed = 2;
        snap.day_mut(date(2024, 5, 2));
        let dates: Vec<_> = snap.daily_history.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2024, 5, 1), date(2024, 5, 2), date(2024, 5, 3)]);
        assert_eq!(snap.day(date(2024, 5, 1)).unwrap().work_sessions_completed, 2);
    }

    #[test]
    fn prune_keeps_exactly_the_window() {
        let today = date(2024, 6, 30);
        let mut snap = StatisticsSnapshot::default();
        snap.day_mut(today - Duration::days(31));
        snap.day_mut(today - Duration::days(30));
        snap.day_mut(today);
        snap.prune(today, 30);
        assert!(snap.day(today - Duration::days(31)).is_none());
        assert!(snap.day(today - Duration::days(30)).is_some());
        assert!(snap.day(today).is_some());
    }

    #[test]
    fn record_uses_dashboard_field_names() {
        let mut snap = StatisticsSnapshot::default();
        snap.day_mut(date(2024, 1, 9)).total_focus_minutes = 25;
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["weeklyData"][0]["date"], "2024-01-09");
        assert_eq!(json["weeklyData"][0]["totalFocusTime"], 25);
        assert!(json.get("currentStreak").is_some());
        assert!(json.get("todaysSessions").is_some());
    }

    #[test]
    fn normalize_merges_duplicate_days() {
        let raw = r#"{"weeklyData":[
            {"date":"2024-01-10","workSessions":1,"totalFocusTime":25,"shortBreaks":0,"longBreaks":0},
            {"date":"2024-01-09","workSessions":2,"totalFocusTime":50,"shortBreaks":1,"longBreaks":0},
            {"date":"2024-01-10","workSessions":1,"totalFocusTime":10,"shortBreaks":0,"longBreaks":1}
        ]}"#;
        let mut snap: StatisticsSnapshot = serde_json::from_str(raw).unwrap();
        snap.normalize();
        assert_eq!(snap.daily_history.len(), 2);
        let day = snap.day(date(2024, 1, 10)).unwrap();
        assert_eq!(day.work_sessions_completed, 2);
        assert_eq!(day.total_focus_minutes, 35);
        assert_eq!(day.long_breaks_completed, 1);
    }
}
