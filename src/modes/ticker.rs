use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::game::TickSchedule;

/// Periodic tick driver that can be stopped and restarted at a new period
#[derive(Debug, Default)]
pub struct TickSource {
    interval: Option<Interval>,
}

impl TickSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, schedule: TickSchedule) {
        match schedule {
            TickSchedule::Restart(period) => self.restart(period),
            TickSchedule::Stop => self.stop(),
        }
    }

    /// Drop the current cadence; the first new tick fires one full period from now
    pub fn restart(&mut self, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    /// Wait for the next tick. Never completes while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_full_period() {
        let mut ticks = TickSource::new();
        ticks.restart(Duration::from_millis(150));
        let start = Instant::now();

        ticks.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(150));

        ticks.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_old_cadence() {
        let mut ticks = TickSource::new();
        ticks.restart(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(60)).await;

        ticks.apply(TickSchedule::Restart(Duration::from_millis(90)));
        let restarted = Instant::now();
        ticks.tick().await;

        assert_eq!(restarted.elapsed(), Duration::from_millis(90));
        assert_eq!(ticks.period(), Some(Duration::from_millis(90)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_source_never_ticks() {
        let mut ticks = TickSource::new();
        ticks.restart(Duration::from_millis(100));
        ticks.apply(TickSchedule::Stop);

        assert!(!ticks.is_running());
        assert!(ticks.period().is_none());
        assert!(
            timeout(Duration::from_secs(10), ticks.tick())
                .await
                .is_err()
        );
    }
}
