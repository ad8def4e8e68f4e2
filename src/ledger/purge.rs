//! Background purge task.
//!
//! ```text
//!   step loop ──record()──▶ ┌──────────────────┐ ◀──purge()── purge thread
//!                           │ Mutex<Vec<Entry>>│              (every N secs)
//!   step loop ◀──total()─── └──────────────────┘
//! ```
//!
//! The task wakes on a fixed real-time cadence, independent of the step
//! length, and drops expired entries.  Aggregates filter by expiry
//! themselves, so a lagging purge only costs memory.  Stopping (or
//! dropping) the handle closes the channel and joins the thread.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

/// Handle to a running purge thread.
pub struct PurgeTask {
    label: &'static str,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PurgeTask {
    /// Spawn a thread that calls `purge` every `interval` until stopped.
    /// `purge` returns the number of entries it removed.
    pub fn spawn<F>(label: &'static str, interval: Duration, mut purge: F) -> io::Result<Self>
    where
        F: FnMut() -> usize + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(format!("purge-{label}"))
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let removed = purge();
                            if removed > 0 {
                                debug!("Purge[{}]: removed {} expired entries", label, removed);
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        info!("Purge[{}]: started (every {:?})", label, interval);
        Ok(Self {
            label,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Whether the thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender wakes the thread with `Disconnected`.
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Purge[{}]: thread panicked", self.label);
            } else {
                info!("Purge[{}]: stopped", self.label);
            }
        }
    }
}

impl Drop for PurgeTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
