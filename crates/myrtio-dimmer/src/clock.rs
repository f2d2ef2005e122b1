//! Tick source abstraction
//!
//! The processor never sleeps directly. Every transition asks its [`Clock`]
//! for a fresh [`TickSource`] built from the interval in effect when the
//! transition starts, so the processor is generic over real and virtual
//! time.

use embassy_time::{Duration, Ticker};

/// Periodic tick source
#[allow(async_fn_in_trait)]
pub trait TickSource {
    /// Wait for the next tick
    async fn next(&mut self);
}

/// Factory for tick sources
pub trait Clock {
    type Ticks: TickSource;

    /// Build a tick source firing every `interval`, starting one interval
    /// from now
    fn ticks(&self, interval: Duration) -> Self::Ticks;
}

/// Clock backed by the embassy time driver
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Ticks = Ticker;

    fn ticks(&self, interval: Duration) -> Ticker {
        Ticker::every(interval)
    }
}

impl TickSource for Ticker {
    async fn next(&mut self) {
        Ticker::next(self).await;
    }
}
