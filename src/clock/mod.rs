/*
 * Wall clock refreshed on a fixed one-second interval
 */

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::utils::unix_seconds;

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub utc: DateTime<Utc>,
    pub unix: u64,
}

impl ClockReading {
    #[must_use]
    pub fn now() -> Self {
        let utc = Utc::now().trunc_subsecs(0);
        Self {
            utc,
            unix: unix_seconds(utc),
        }
    }
}

/// Spawns the ticking task. It stops once every receiver is dropped.
#[must_use]
pub fn spawn_clock(interval: Duration) -> (watch::Receiver<ClockReading>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(ClockReading::now());

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if tx.send(ClockReading::now()).is_err() {
                break;
            }
        }
    });

    (rx, handle)
}
