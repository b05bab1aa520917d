//! Countdown modes and their configured lengths.
//!
//! A [`TimerMode`] carries its display label and completion alert text;
//! [`Durations`] maps each mode to a positive number of seconds.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The three countdown modes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_break(&self) -> bool {
        !matches!(self, TimerMode::Work)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "FOCUS SESSION",
            TimerMode::ShortBreak => "SHORT BREAK",
            TimerMode::LongBreak => "LONG BREAK",
        }
    }

    /// Title and body of the alert shown when this mode completes.
    pub fn completion_message(&self) -> (&'static str, &'static str) {
        match self {
            TimerMode::Work => ("BREAK TIME!", "Great job! Time for a well-deserved break."),
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                ("BACK TO WORK!", "Break's over! Ready to focus again?")
            }
        }
    }
}

impl std::str::FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "longbreak" | "long" => Ok(TimerMode::LongBreak),
            other => Err(format!("unknown timer mode: {other}")),
        }
    }
}

/// Full countdown length of each mode, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Durations {
    /// # Errors
    /// Returns `InvalidValue` if any length is zero.
    pub fn new(work: u32, short_break: u32, long_break: u32) -> Result<Self, ConfigError> {
        for (key, value) in [
            ("work", work),
            ("short_break", short_break),
            ("long_break", long_break),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "duration must be positive".into(),
                });
            }
        }
        Ok(Self {
            work,
            short_break,
            long_break,
        })
    }

    /// # Errors
    /// Returns `InvalidValue` if any length is zero.
    pub fn from_minutes(work: u32, short_break: u32, long_break: u32) -> Result<Self, ConfigError> {
        Self::new(
            work.saturating_mul(60),
            short_break.saturating_mul(60),
            long_break.saturating_mul(60),
        )
    }

    pub fn for_mode(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
        }
    }
}
