mod engine;
mod mode;
mod session;
mod ticker;

pub use engine::{format_clock, EngineSettings, Notification, TimerEngine};
pub use mode::{Durations, TimerMode};
pub use session::{compute_remaining, TimerSession};
pub use ticker::{Ticker, TickerExit};
