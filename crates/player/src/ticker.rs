//! The repeating frame-advance task.
//!
//! Exactly one ticker runs at a time, gated by the play flag: the
//! engine spawns one when playback starts and cancels it on pause,
//! terminal stop, and shutdown. The task is a plain `tokio::select!`
//! loop over a child [`CancellationToken`] and a fixed-period interval,
//! so every exit path tears the timer down.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use toonweave_core::timeline::FRAME_RATE;

/// Period between frame-advance ticks (1/30 s).
pub const FRAME_INTERVAL: Duration = Duration::from_micros(1_000_000 / FRAME_RATE as u64);

/// Handle to a running ticker task.
pub struct Ticker {
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

impl Ticker {
    /// Spawn a repeating task that invokes `on_tick` every
    /// [`FRAME_INTERVAL`], starting one interval from now.
    ///
    /// The task stops when `on_tick` returns `false`, when the returned
    /// handle is [`stop`](Self::stop)ped, or when `parent` is cancelled.
    /// Ticks missed under load are skipped rather than replayed in a
    /// burst; the frame counter tolerates drift.
    pub fn spawn<F, Fut>(parent: &CancellationToken, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send,
    {
        let cancel = parent.child_token();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + FRAME_INTERVAL;
            let mut interval = tokio::time::interval_at(start, FRAME_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        tracing::debug!("Ticker cancelled");
                        return;
                    }
                    _ = interval.tick() => {
                        if !on_tick().await {
                            return;
                        }
                    }
                }
            }
        });

        Self { cancel, handle }
    }

    /// Cancel the task and wait briefly for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(1), self.handle).await;
    }
}
