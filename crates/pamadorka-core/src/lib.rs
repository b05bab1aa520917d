//! # Pamadorka Core Library
//!
//! This library provides the core logic for the Pamadorka focus timer:
//! a work / short-break / long-break countdown that survives restarts,
//! plus the statistics it feeds. The CLI is a thin presentation layer over
//! the same library.
//!
//! ## Architecture
//!
//! - **Clock**: wall-clock reads, swappable for a manual clock in tests
//! - **Timer Engine**: a state machine whose countdown is always recomputed
//!   from an anchor timestamp; the caller drives it with `tick()`
//! - **Statistics**: daily focus minutes, session counts and streaks
//! - **Storage**: the `timerState` and `statistics` records behind an
//!   injected key-value port, plus TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`StatisticsAggregator`]: Rollups fed by timer completions
//! - [`StateStore`]: Persistence port ([`Database`], [`MemoryStore`], [`DisabledStore`])
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use stats::{DailyStat, DashboardSummary, StatisticsAggregator, StatisticsSnapshot, StatsSettings};
pub use storage::{Config, Database, DisabledStore, MemoryStore, StateKey, StateStore};
pub use timer::{
    compute_remaining, Durations, EngineSettings, Notification, Ticker, TickerExit, TimerEngine,
    TimerMode, TimerSession,
};
