//! Periodic driver for [`TimerEngine::tick`].
//!
//! The ticker borrows the engine for as long as it runs. Returning from
//! [`Ticker::run`] (or dropping its future) cancels the schedule, so no
//! callback can touch the engine afterwards.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use super::engine::TimerEngine;
use crate::events::Event;

/// Why [`Ticker::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerExit {
    /// The engine stopped and has no notification left to expire.
    Idle,
    /// The shutdown future resolved.
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Tick `engine` every period until it goes idle or `shutdown` resolves.
    ///
    /// `on_tick` sees the engine after every tick along with the event that
    /// tick produced, if any. Missed ticks are skipped, not replayed.
    pub async fn run<S, F>(&self, engine: &mut TimerEngine, shutdown: S, mut on_tick: F) -> TickerExit
    where
        S: Future<Output = ()>,
        F: FnMut(&TimerEngine, Option<&Event>),
    {
        let mut ticks = interval(self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::debug!("ticker shut down");
                    return TickerExit::Shutdown;
                }
                _ = ticks.tick() => {
                    let event = engine.tick();
                    on_tick(engine, event.as_ref());
                    if engine.is_idle() {
                        return TickerExit::Idle;
                    }
                }
            }
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use crate::timer::{Durations, EngineSettings, TimerMode};

    fn short_engine(clock: Rc<ManualClock>) -> TimerEngine {
        let settings = EngineSettings {
            durations: Durations::new(3, 2, 4).unwrap(),
            notification_secs: 1,
            ..EngineSettings::default()
        };
        TimerEngine::new(Rc::new(MemoryStore::new()), clock, settings)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_until_completion_and_notification_expire() {
        let clock = Rc::new(ManualClock::new(0));
        let mut engine = short_engine(clock.clone());
        engine.start();

        let mut events = Vec::new();
        let exit = Ticker::new(Duration::from_millis(100))
            .run(&mut engine, std::future::pending(), |_, event| {
                clock.advance_ms(250);
                if let Some(e) = event {
                    events.push(e.clone());
                }
            })
            .await;

        assert_eq!(exit, TickerExit::Idle);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::TimerCompleted {
                completed_mode: TimerMode::Work,
                ..
            }
        ));
        assert!(matches!(events[1], Event::NotificationCleared { .. }));
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_a_running_timer() {
        let clock = Rc::new(ManualClock::new(0));
        let mut engine = short_engine(clock.clone());
        engine.start();

        let mut ticks = 0;
        let exit = Ticker::default()
            .run(
                &mut engine,
                tokio::time::sleep(Duration::from_millis(350)),
                |_, _| ticks += 1,
            )
            .await;

        assert_eq!(exit, TickerExit::Shutdown);
        assert!(ticks >= 3);
        assert!(engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_engine_returns_after_one_tick() {
        let clock = Rc::new(ManualClock::new(0));
        let mut engine = short_engine(clock);
        let mut ticks = 0;
        let exit = Ticker::default()
            .run(&mut engine, std::future::pending(), |_, _| ticks += 1)
            .await;
        assert_eq!(exit, TickerExit::Idle);
        assert_eq!(ticks, 1);
    }
}
