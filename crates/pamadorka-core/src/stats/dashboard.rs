//! Read-only rollups for the statistics dashboard.

use chrono::Datelike;
use serde::Serialize;

use super::snapshot::StatisticsSnapshot;

/// Sessions needed for a day cell to render at full intensity.
const FULL_INTENSITY_SESSIONS: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: chrono::NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub weekday: String,
    pub work_sessions: u32,
    /// 0.0 ..= 1.0
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_sessions: u64,
    pub total_focus_minutes: u64,
    pub total_focus: String,
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    pub streak_status: &'static str,
    pub todays_sessions: u32,
    pub weekly_average: u64,
    pub average_session_minutes: f64,
    pub recent_days: Vec<DayCell>,
}

impl DashboardSummary {
    pub fn from_snapshot(snap: &StatisticsSnapshot) -> Self {
        Self {
            total_sessions: snap.total_sessions,
            total_focus_minutes: snap.total_focus_minutes,
            total_focus: format_minutes(snap.total_focus_minutes),
            current_streak_days: snap.current_streak_days,
            longest_streak_days: snap.longest_streak_days,
            streak_status: streak_status(snap.current_streak_days),
            todays_sessions: snap.todays_sessions,
            weekly_average: weekly_average(snap),
            average_session_minutes: average_session_minutes(snap),
            recent_days: recent_days(snap, 7),
        }
    }
}

pub fn streak_status(streak: u32) -> &'static str {
    match streak {
        0 => "Start your journey!",
        1..=2 => "Building momentum...",
        3..=6 => "Great progress!",
        7..=13 => "Excellent consistency!",
        _ => "Productivity master!",
    }
}

/// Mean work sessions per recorded day, rounded.
pub fn weekly_average(snap: &StatisticsSnapshot) -> u64 {
    let days = snap.daily_history.len() as u64;
    if days == 0 {
        return 0;
    }
    let total: u64 = snap
        .daily_history
        .iter()
        .map(|d| u64::from(d.work_sessions_completed))
        .sum();
    (total as f64 / days as f64).round() as u64
}

/// Focus minutes per completed session, to one decimal.
pub fn average_session_minutes(snap: &StatisticsSnapshot) -> f64 {
    if snap.total_sessions == 0 {
        return 0.0;
    }
    let avg = snap.total_focus_minutes as f64 / snap.total_sessions as f64;
    (avg * 10.0).round() / 10.0
}

/// The last `n` recorded days, oldest first.
pub fn recent_days(snap: &StatisticsSnapshot, n: usize) -> Vec<DayCell> {
    let skip = snap.daily_history.len().saturating_sub(n);
    snap.daily_history
        .iter()
        .skip(skip)
        .map(|d| DayCell {
            date: d.date,
            weekday: d.date.weekday().to_string(),
            work_sessions: d.work_sessions_completed,
            intensity: (f64::from(d.work_sessions_completed) / FULL_INTENSITY_SESSIONS).min(1.0),
        })
        .collect()
}

/// "1h 5m" above an hour, "45m" below.
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn history(sessions: &[u32]) -> StatisticsSnapshot {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let mut snap = StatisticsSnapshot::default();
        for (i, n) in sessions.iter().enumerate() {
            snap.day_mut(start + Duration::days(i as i64)).work_sessions_completed = *n;
        }
        snap
    }

    #[test]
    fn streak_status_brackets() {
        assert_eq!(streak_status(0), "Start your journey!");
        assert_eq!(streak_status(2), "Building momentum...");
        assert_eq!(streak_status(3), "Great progress!");
        assert_eq!(streak_status(13), "Excellent consistency!");
        assert_eq!(streak_status(14), "Productivity master!");
    }

    #[test]
    fn weekly_average_rounds() {
        assert_eq!(weekly_average(&StatisticsSnapshot::default()), 0);
        assert_eq!(weekly_average(&history(&[1, 2])), 2);
        assert_eq!(weekly_average(&history(&[1, 1, 2])), 1);
    }

    #[test]
    fn average_session_length_one_decimal() {
        let snap = StatisticsSnapshot {
            total_sessions: 3,
            total_focus_minutes: 76,
            ..Default::default()
        };
        assert_eq!(average_session_minutes(&snap), 25.3);
        assert_eq!(average_session_minutes(&StatisticsSnapshot::default()), 0.0);
    }

    #[test]
    fn recent_days_takes_the_tail_with_intensity() {
        let snap = history(&[9, 0, 1, 2, 3, 4, 8, 12]);
        let cells = recent_days(&snap, 7);
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0].work_sessions, 0);
        assert_eq!(cells[0].weekday, "Tue");
        assert_eq!(cells[3].intensity, 0.375);
        assert_eq!(cells[6].intensity, 1.0);
    }

    #[test]
    fn minutes_formatting() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(125), "2h 5m");
    }
}
