//! The shared refresh scheduler.
//!
//! One timer drives every polled collection. Each tick yields the batch of
//! collections to refresh; the app skips any collection whose previous fetch
//! is still in flight, so a slow engine never accumulates queued fetches.
//! Manual refreshes go around the scheduler entirely and do not disturb its
//! cadence.
//!
//! The scheduler is dropped with the app — there is no detached timer task
//! to leak.

use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// A polled collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Peers,
    Channels,
}

/// Periodic refresh driver for the registered collections.
pub struct RefreshScheduler {
    interval: Interval,
    collections: Vec<CollectionKind>,
}

impl RefreshScheduler {
    /// Creates a scheduler ticking every `period` for `collections`.
    ///
    /// The first tick fires one full period after creation — startup does
    /// its own immediate fetch, so an immediate first tick would double it.
    pub fn new(period: Duration, collections: Vec<CollectionKind>) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        // If a tick is missed (slow render, suspended laptop), resume the
        // cadence instead of firing a burst of catch-up refreshes.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            collections,
        }
    }

    /// Waits for the next tick and returns the collections to refresh.
    pub async fn tick(&mut self) -> Vec<CollectionKind> {
        self.interval.tick().await;
        self.collections.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_comes_after_a_full_period() {
        let period = Duration::from_secs(5);
        let mut scheduler =
            RefreshScheduler::new(period, vec![CollectionKind::Peers, CollectionKind::Channels]);

        let start = Instant::now();
        let batch = scheduler.tick().await;
        assert_eq!(start.elapsed(), period);
        assert_eq!(batch, vec![CollectionKind::Peers, CollectionKind::Channels]);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_keep_the_cadence() {
        let period = Duration::from_secs(5);
        let mut scheduler = RefreshScheduler::new(period, vec![CollectionKind::Peers]);

        let start = Instant::now();
        scheduler.tick().await;
        scheduler.tick().await;
        assert_eq!(start.elapsed(), period * 2);
    }
}
