mod config;
pub mod database;
mod store;

pub use config::{Config, NotificationsConfig, ScheduleConfig, StatsConfig};
pub use database::Database;
pub use store::{load_record, save_record, DisabledStore, MemoryStore, StateKey, StateStore};

use std::path::PathBuf;

/// Returns `~/.config/pamadorka[-dev]/` based on PAMADORKA_ENV.
///
/// Set PAMADORKA_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PAMADORKA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pamadorka-dev")
    } else {
        base_dir.join("pamadorka")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
