//! Fixed-interval scheduler for the poll loop.
//!
//! One repeating task, no backoff, no overlap: a tick runs to completion, then
//! the runner sleeps for the interval. Cancellation is only observed while
//! sleeping, so a cycle is never cut in half.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// A unit of work run once per interval.
#[async_trait]
pub trait RepeatingTask: Send {
    async fn tick(&mut self);
}

#[derive(Clone, Copy, Debug)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run `task` immediately and then every `interval` until `cancel` fires.
    ///
    /// Returns the number of ticks that ran.
    pub async fn run(&self, task: &mut dyn RepeatingTask, cancel: &CancellationToken) -> u64 {
        let mut ticks = 0u64;
        while !cancel.is_cancelled() {
            task.tick().await;
            ticks += 1;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }
        tracing::info!(ticks, "scheduler stopped");
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    struct Counting {
        ticks: Vec<Instant>,
        stop_after: usize,
        cancel: CancellationToken,
    }

    #[async_trait]
    impl RepeatingTask for Counting {
        async fn tick(&mut self) {
            self.ticks.push(Instant::now());
            if self.ticks.len() >= self.stop_after {
                self.cancel.cancel();
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_spaced_by_interval() {
        let cancel = CancellationToken::new();
        let mut task = Counting {
            ticks: Vec::new(),
            stop_after: 3,
            cancel: cancel.clone(),
        };
        let start = Instant::now();
        let ran = FixedInterval::new(Duration::from_secs(600))
            .run(&mut task, &cancel)
            .await;

        assert_eq!(ran, 3);
        assert!(task.ticks[0] - start < Duration::from_millis(5));
        for pair in task.ticks.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_secs(600), "gap {gap:?}");
            assert!(gap < Duration::from_secs(601), "gap {gap:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_runs_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut task = Counting {
            ticks: Vec::new(),
            stop_after: usize::MAX,
            cancel: cancel.clone(),
        };
        let ran = FixedInterval::new(Duration::from_secs(1))
            .run(&mut task, &cancel)
            .await;
        assert_eq!(ran, 0);
        assert!(task.ticks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_sleep_stops_without_another_tick() {
        let cancel = CancellationToken::new();
        let mut task = Counting {
            ticks: Vec::new(),
            stop_after: usize::MAX,
            cancel: cancel.clone(),
        };

        let stopper = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(90)).await;
            stopper.cancel();
        });

        let start = Instant::now();
        let ran = FixedInterval::new(Duration::from_secs(60))
            .run(&mut task, &cancel)
            .await;

        // Ticks at t=0 and t=60; cancelled at t=90 while sleeping.
        assert_eq!(ran, 2);
        let elapsed = Instant::now() - start;
        assert!(elapsed >= Duration::from_secs(90), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(120), "elapsed {elapsed:?}");
    }
}
