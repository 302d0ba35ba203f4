//! Watchers — background event sources feeding the main queue.
//!
//! Each watcher lives on its own thread and communicates only by
//! enqueueing closures; it never touches elements or signals directly.
//! Every watcher observes the stop flag and exits promptly when the
//! app shuts down.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use super::{App, Task, send_task};

/// How often a blocked watcher re-checks the stop flag.
const STOP_POLL: Duration = Duration::from_millis(100);

impl App {
    /// Watch a channel: each received value is handed to `handler` on
    /// the main thread. The watcher exits when the channel closes or
    /// the app stops.
    pub fn watch_channel<T: Send + 'static>(
        &mut self,
        rx: Receiver<T>,
        handler: impl FnMut(&mut App, T) + Send + 'static,
    ) {
        let tx = self.task_sender();
        let stopped = self.stopped_flag();
        let handler = Arc::new(std::sync::Mutex::new(handler));

        let join = std::thread::spawn(move || {
            loop {
                if stopped.load(Ordering::SeqCst) {
                    break;
                }
                match rx.recv_timeout(STOP_POLL) {
                    Ok(value) => {
                        let handler = Arc::clone(&handler);
                        let task: Task = Box::new(move |app: &mut App| {
                            if let Ok(mut h) = handler.lock() {
                                (*h)(app, value);
                            }
                        });
                        if !send_task(&tx, &stopped, task) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::debug!("channel watcher exited");
        });
        self.track_worker(join);
    }

    /// Run `tick` on the main thread at a fixed interval until the app
    /// stops.
    pub fn every(&mut self, interval: Duration, tick: impl FnMut(&mut App) + Send + 'static) {
        let tx = self.task_sender();
        let stopped = self.stopped_flag();
        let tick = Arc::new(std::sync::Mutex::new(tick));

        let join = std::thread::spawn(move || {
            loop {
                // Sleep in slices so shutdown is never delayed by a
                // long interval.
                let mut remaining = interval;
                while !remaining.is_zero() {
                    if stopped.load(Ordering::SeqCst) {
                        tracing::debug!("timer watcher exited");
                        return;
                    }
                    let slice = remaining.min(STOP_POLL);
                    std::thread::sleep(slice);
                    remaining = remaining.saturating_sub(slice);
                }
                if stopped.load(Ordering::SeqCst) {
                    break;
                }
                let tick = Arc::clone(&tick);
                let task: Task = Box::new(move |app: &mut App| {
                    if let Ok(mut t) = tick.lock() {
                        (*t)(app);
                    }
                });
                if !send_task(&tx, &stopped, task) {
                    break;
                }
            }
            tracing::debug!("timer watcher exited");
        });
        self.track_worker(join);
    }

    fn track_worker(&mut self, join: std::thread::JoinHandle<()>) {
        self.workers.push(join);
    }
}
