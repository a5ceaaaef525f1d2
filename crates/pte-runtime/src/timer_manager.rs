use crate::table_task::Inbound;
use pte_core::SeatIndex;
use pte_table::{ActionTimerHandle, TimerClock};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Tokio-backed wrapper around [`TimerClock`]: `start`/`clear` plus a
/// spawned sleep that reports back through the table's own inbound
/// channel rather than a polled `deadline()` — the event loop here is
/// push- not pull-driven.
#[derive(Debug, Default)]
pub struct TimerManager {
    clock: TimerClock,
}

impl TimerManager {
    /// Starts a fresh generation for `seat` and spawns the task that will
    /// report it expired after `duration`. Starting a new timer
    /// implicitly invalidates whatever was running before.
    pub fn start(&mut self, seat: SeatIndex, duration: Duration, inbound: UnboundedSender<Inbound>) {
        let handle = self.clock.start(seat);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = inbound.send(Inbound::TimerFired(handle));
        });
    }

    pub fn clear(&mut self) {
        self.clock.clear();
    }

    pub fn is_current(&self, handle: ActionTimerHandle) -> bool {
        handle.is_current(&self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::Duration;

    #[tokio::test]
    async fn starting_a_second_timer_invalidates_the_first() {
        let mut timers = TimerManager::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        timers.start(0, Duration::from_millis(10), tx.clone());
        timers.start(0, Duration::from_millis(10), tx);

        tokio::time::sleep(Duration::from_millis(30)).await;
        let mut seen = 0;
        while let Ok(Inbound::TimerFired(handle)) = rx.try_recv() {
            if timers.is_current(handle) {
                seen += 1;
            }
        }
        assert_eq!(seen, 1);
    }

    #[tokio::test]
    async fn clear_invalidates_whatever_is_running() {
        let mut timers = TimerManager::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        timers.start(0, Duration::from_millis(10), tx);
        timers.clear();

        tokio::time::sleep(Duration::from_millis(30)).await;
        if let Ok(Inbound::TimerFired(handle)) = rx.try_recv() {
            assert!(!timers.is_current(handle));
        }
    }
}
