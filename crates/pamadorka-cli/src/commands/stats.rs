use std::rc::Rc;

use clap::Subcommand;
use pamadorka_core::error::Result;
use pamadorka_core::{Clock, Config, DailyStat, DashboardSummary, StatisticsAggregator, SystemClock};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Full statistics record
    Show,
    /// Today's counters
    Today,
    /// Dashboard summary: streak status, averages, last seven days
    Dashboard,
}

pub fn run(action: StatsAction) -> Result<()> {
    let config = Config::load_or_default();
    let clock = Rc::new(SystemClock);
    let stats = StatisticsAggregator::load(super::open_store(), clock.clone(), config.stats_settings());
    let current = stats.current();

    match action {
        StatsAction::Show => super::print_json(&current)?,
        StatsAction::Today => {
            let today = clock.today();
            let day = current
                .day(today)
                .cloned()
                .unwrap_or_else(|| DailyStat::new(today));
            super::print_json(&day)?;
        }
        StatsAction::Dashboard => {
            super::print_json(&DashboardSummary::from_snapshot(&current))?;
        }
    }
    Ok(())
}
