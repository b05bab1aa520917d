use std::rc::Rc;
use std::time::Duration;

use clap::Subcommand;
use pamadorka_core::error::Result;
use pamadorka_core::{Config, Event, SystemClock, Ticker, TickerExit, TimerEngine, TimerMode};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start if stopped, pause if running
    Toggle,
    /// Switch mode (work, short-break, long-break); the timer stops
    Mode {
        mode: TimerMode,
    },
    /// Override the remaining seconds, clamped to the mode's duration
    Set {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
    /// Restore the full countdown for the current mode
    Reset,
    /// Dismiss the completion notification
    Dismiss,
    /// Start if needed and run the countdown in the foreground until it completes
    Watch,
}

pub fn run(action: TimerAction) -> Result<()> {
    let config = Config::load_or_default();
    let settings = config.engine_settings()?;
    let (mut engine, lapsed) =
        TimerEngine::restore(super::open_store(), Rc::new(SystemClock), settings);

    if let Some(event) = &lapsed {
        super::print_json(event)?;
    }

    let event = match action {
        TimerAction::Status => {
            if let Some(event) = engine.tick() {
                super::print_json(&event)?;
            }
            return super::print_json(&engine.snapshot());
        }
        TimerAction::Start => engine.start(),
        TimerAction::Pause => engine.pause(),
        TimerAction::Toggle => engine.toggle_running(),
        TimerAction::Mode { mode } => engine.change_mode(mode),
        TimerAction::Set { seconds } => engine.set_time_left(seconds),
        TimerAction::Reset => engine.reset(),
        TimerAction::Dismiss => engine.dismiss_notification(),
        TimerAction::Watch => {
            return watch(&mut engine, Duration::from_millis(config.tick_interval_ms));
        }
    };

    match event {
        Some(event) => super::print_json(&event)?,
        None => super::print_json(&engine.snapshot())?,
    }
    Ok(())
}

fn watch(engine: &mut TimerEngine, period: Duration) -> Result<()> {
    if !engine.is_running() {
        engine.start();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let mut last_shown = None;
    let exit = runtime.block_on(Ticker::new(period).run(engine, shutdown, |engine, event| {
        if let Some(Event::TimerCompleted { completed_mode, .. }) = event {
            let (title, body) = completed_mode.completion_message();
            println!("\n{title} {body}");
        }
        if engine.is_running() {
            let shown = engine.formatted_time();
            if last_shown.as_ref() != Some(&shown) {
                println!("{}  {shown}", engine.mode().label());
                last_shown = Some(shown);
            }
        }
    }));

    if exit == TickerExit::Shutdown {
        tracing::debug!("watch interrupted; timer keeps running in the background");
    }
    super::print_json(&engine.snapshot())?;
    Ok(())
}
