//! Periodic countdown refresh that stops with its owner.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::phase::{AuctionPhase, Countdown};

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// The dates the countdown runs against. The end moves on soft close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Publishes a fresh `Countdown` every tick until the ticker is dropped.
/// Once the auction has ended it stays quiet unless the end date is moved.
/// Dropping aborts the background task.
#[derive(Debug)]
pub struct CountdownTicker {
    schedule: watch::Sender<Schedule>,
    receiver: watch::Receiver<Countdown>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    /// Must be called from within a tokio runtime.
    pub fn spawn(start: DateTime<Utc>, end: DateTime<Utc>, period: Duration) -> Self {
        Self::spawn_with_clock(start, end, period, Utc::now)
    }

    pub fn spawn_with_clock<C>(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: Duration,
        clock: C,
    ) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let (schedule, mut dates) = watch::channel(Schedule { start, end });
        let (sender, receiver) = watch::channel(Countdown::at(start, end, clock()));
        let task = tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let Schedule { start, end } = *dates.borrow_and_update();
                let countdown = Countdown::at(start, end, clock());
                if sender.send(countdown).is_err() {
                    break;
                }

                let next = if countdown.phase == AuctionPhase::Ended {
                    debug!("Auction ended, countdown paused");
                    dates.changed().await
                } else {
                    tokio::select! {
                        _ = ticks.tick() => Ok(()),
                        changed = dates.changed() => changed,
                    }
                };
                if next.is_err() {
                    break;
                }
            }
        });
        CountdownTicker {
            schedule,
            receiver,
            task,
        }
    }

    pub fn latest(&self) -> Countdown {
        *self.receiver.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        self.receiver.clone()
    }

    pub fn schedule(&self) -> Schedule {
        *self.schedule.borrow()
    }

    /// Moves the end of the auction; a paused countdown resumes.
    pub fn set_end_date(&self, end: DateTime<Utc>) {
        self.schedule.send_modify(|schedule| schedule.end = end);
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
