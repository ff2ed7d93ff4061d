//! Background refresh ticker.
//!
//! The ticker wakes the host event loop at a fixed interval so idle
//! animations (spinner fades, tooltips) get redrawn. It only sends a token
//! over a channel; it never touches widget state.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

use crate::error::TickerError;
use crate::logging::targets;

/// Default interval between wakeups.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(50);

/// Token sent by the ticker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// A background thread that sends a [`Tick`] every interval.
///
/// The tick channel holds at most one pending tick, so a host that falls
/// behind sees a single wakeup rather than a backlog.
#[derive(Debug)]
pub struct RefreshTicker {
    ticks: Receiver<Tick>,
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl RefreshTicker {
    /// Start a ticker with the default 50 ms interval.
    pub fn spawn_default() -> Result<Self, TickerError> {
        Self::spawn(DEFAULT_REFRESH_INTERVAL)
    }

    /// Start a ticker with the given interval.
    pub fn spawn(interval: Duration) -> Result<Self, TickerError> {
        let (tick_tx, tick_rx) = bounded::<Tick>(1);
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("trellis-refresh".into())
            .spawn(move || {
                tracing::trace!(target: targets::TICKER, ?interval, "ticker started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            // A full channel means the host has not drained the last tick yet.
                            let _ = tick_tx.try_send(Tick);
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::trace!(target: targets::TICKER, "ticker stopped");
            })?;

        Ok(Self {
            ticks: tick_rx,
            shutdown: Some(stop_tx),
            handle: Some(handle),
            interval,
        })
    }

    /// The wakeup interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The receiving end of the tick channel, for use in a host `select!`.
    pub fn receiver(&self) -> &Receiver<Tick> {
        &self.ticks
    }

    /// Consume a pending tick without blocking.
    pub fn try_tick(&self) -> bool {
        self.ticks.try_recv().is_ok()
    }

    /// Block until the next tick or until `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.ticks.recv_timeout(timeout).is_ok()
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(mut self) -> Result<(), TickerError> {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> Result<(), TickerError> {
        // Dropping the sender disconnects the stop channel and ends the loop.
        self.shutdown.take();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| TickerError::Panicked),
            None => Ok(()),
        }
    }
}

impl Drop for RefreshTicker {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown_and_join() {
            tracing::warn!(target: targets::TICKER, %err, "ticker shutdown failed");
        }
    }
}
