//! The one-second display tick.
//!
//! The interval only exists while a timer runs; [`Ticker::sync_with`] drops
//! it the moment the timer stops so no callback outlives the timer.

use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval_at, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
pub struct Ticker {
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self) -> bool {
        self.interval.is_some()
    }

    /// Register or unregister the tick to match the timer state.
    pub fn sync_with(&mut self, running: bool) {
        match (running, self.interval.is_some()) {
            (true, false) => {
                let mut iv = interval_at(Instant::now() + TICK, TICK);
                iv.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.interval = Some(iv);
            }
            (false, true) => self.interval = None,
            _ => {}
        }
    }

    /// Resolves on the next tick; never resolves while unregistered.
    pub async fn next(&mut self) {
        match self.interval.as_mut() {
            Some(iv) => {
                iv.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
