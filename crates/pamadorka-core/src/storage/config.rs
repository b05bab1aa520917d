//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Interval lengths and the long-break cadence
//! - Streak threshold and history retention
//! - How long completion alerts stay on screen
//!
//! Configuration is stored at `~/.config/pamadorka/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::stats::StatsSettings;
use crate::timer::{Durations, EngineSettings};

/// Interval lengths, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_pomodoros_before_long_break")]
    pub pomodoros_before_long_break: u32,
}

/// Statistics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Focus minutes a day needs before it counts towards the streak.
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold_minutes: u32,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

/// Completion alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_display_secs")]
    pub display_secs: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pamadorka/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Period of the countdown refresh.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_focus_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_pomodoros_before_long_break() -> u32 {
    4
}
fn default_streak_threshold() -> u32 {
    5
}
fn default_retention_days() -> u32 {
    30
}
fn default_display_secs() -> u32 {
    5
}
fn default_tick_interval_ms() -> u64 {
    100
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            pomodoros_before_long_break: default_pomodoros_before_long_break(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            streak_threshold_minutes: default_streak_threshold(),
            retention_days: default_retention_days(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            display_secs: default_display_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            stats: StatsConfig::default(),
            notifications: NotificationsConfig::default(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or is
    /// invalid, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save to the default location.
    ///
    /// # Errors
    ///
    /// See [`Config::apply`] and [`Config::save`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Every duration and count must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("schedule.focus_duration", u64::from(self.schedule.focus_duration)),
            ("schedule.short_break", u64::from(self.schedule.short_break)),
            ("schedule.long_break", u64::from(self.schedule.long_break)),
            (
                "schedule.pomodoros_before_long_break",
                u64::from(self.schedule.pomodoros_before_long_break),
            ),
            (
                "stats.streak_threshold_minutes",
                u64::from(self.stats.streak_threshold_minutes),
            ),
            ("stats.retention_days", u64::from(self.stats.retention_days)),
            ("notifications.display_secs", u64::from(self.notifications.display_secs)),
            ("tick_interval_ms", self.tick_interval_ms),
        ];
        for (key, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than zero".into(),
                });
            }
        }
        Ok(())
    }

    /// Interval lengths in seconds.
    pub fn durations(&self) -> Result<Durations, ConfigError> {
        Durations::from_minutes(
            self.schedule.focus_duration,
            self.schedule.short_break,
            self.schedule.long_break,
        )
    }

    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        self.validate()?;
        Ok(EngineSettings {
            durations: self.durations()?,
            long_break_interval: self.schedule.pomodoros_before_long_break,
            notification_secs: self.notifications.display_secs,
            stats: self.stats_settings(),
        })
    }

    pub fn stats_settings(&self) -> StatsSettings {
        StatsSettings {
            streak_threshold_minutes: self.stats.streak_threshold_minutes,
            retention_days: self.stats.retention_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.schedule.focus_duration, 25);
        assert_eq!(parsed.stats.streak_threshold_minutes, 5);
        assert_eq!(parsed.tick_interval_ms, 100);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[schedule]\nfocus_duration = 50\n").unwrap();
        assert_eq!(parsed.schedule.focus_duration, 50);
        assert_eq!(parsed.schedule.short_break, 5);
        assert_eq!(parsed.stats.retention_days, 30);
        assert_eq!(parsed.notifications.display_secs, 5);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("schedule.focus_duration").as_deref(), Some("25"));
        assert_eq!(cfg.get("tick_interval_ms").as_deref(), Some("100"));
        assert!(cfg.get("schedule.missing_key").is_none());
        assert!(cfg.get("schedule").is_none());
    }

    #[test]
    fn apply_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.apply("schedule.short_break", "7").unwrap();
        assert_eq!(cfg.schedule.short_break, 7);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("ui.dark_mode", "true"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_non_numeric_value() {
        let mut cfg = Config::default();
        assert!(cfg.apply("schedule.long_break", "soon").is_err());
        assert_eq!(cfg.schedule.long_break, 15);
    }

    #[test]
    fn apply_rejects_zero_duration_and_leaves_config_untouched() {
        let mut cfg = Config::default();
        let err = cfg.apply("schedule.focus_duration", "0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.schedule.focus_duration, 25);
    }

    #[test]
    fn engine_settings_convert_minutes_to_seconds() {
        let settings = Config::default().engine_settings().unwrap();
        assert_eq!(settings.durations.work, 1500);
        assert_eq!(settings.durations.short_break, 300);
        assert_eq!(settings.durations.long_break, 900);
        assert_eq!(settings.long_break_interval, 4);
        assert_eq!(settings.notification_secs, 5);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.schedule.focus_duration, 25);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nlong_break = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("stats.streak_threshold_minutes", "10").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.stats.streak_threshold_minutes, 10);
    }
}
