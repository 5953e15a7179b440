//! Playback timer driving the simulated playhead.
//!
//! A [`PlaybackTimer`] is owned by one canvas. With a tokio driver it runs an
//! interval task that sends a tick over a channel every period; the canvas
//! drains ticks on its own thread. Dropping the timer aborts the task, so a
//! paused, stopped or dropped canvas never keeps a task alive.

use crossbeam_channel::{unbounded, Receiver};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// How timers are driven.
#[derive(Debug, Clone, Default)]
pub enum TimerDriver {
    /// No background task; the owner calls `tick()` itself.
    #[default]
    Manual,
    /// Interval task spawned on this runtime.
    Tokio(Handle),
}

impl TimerDriver {
    /// Tokio driver on the current runtime, if called from inside one.
    pub fn current() -> Self {
        match Handle::try_current() {
            Ok(handle) => Self::Tokio(handle),
            Err(_) => Self::Manual,
        }
    }
}

/// Handle to one running timer.
pub struct PlaybackTimer {
    ticks: Receiver<()>,
    task: Option<JoinHandle<()>>,
}

impl PlaybackTimer {
    /// Start a timer ticking every `period`.
    pub fn start(driver: &TimerDriver, period: Duration) -> Self {
        let (tx, rx) = unbounded();
        let task = match driver {
            TimerDriver::Manual => None,
            TimerDriver::Tokio(handle) => {
                let period = period.max(Duration::from_millis(1));
                Some(handle.spawn(async move {
                    let mut interval = tokio::time::interval(period);
                    // First tick completes immediately.
                    interval.tick().await;
                    loop {
                        interval.tick().await;
                        if tx.send(()).is_err() {
                            break;
                        }
                    }
                }))
            }
        };
        debug!(?period, background = task.is_some(), "Playback timer started");
        Self { ticks: rx, task }
    }

    /// Number of ticks delivered since the last drain.
    pub fn drain(&self) -> usize {
        self.ticks.try_iter().count()
    }

    /// Whether a background task backs this timer.
    pub fn is_background(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for PlaybackTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Playback timer released");
        }
    }
}

impl std::fmt::Debug for PlaybackTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackTimer")
            .field("background", &self.is_background())
            .finish()
    }
}
