//! Statistics for Pamadorka.
//!
//! Daily and all-time focus rollups, streak tracking, and the derived
//! figures shown on the dashboard.

mod aggregator;
pub mod dashboard;
mod snapshot;

pub use aggregator::{StatisticsAggregator, StatsSettings};
pub use dashboard::DashboardSummary;
pub use snapshot::{DailyStat, StatisticsSnapshot};
