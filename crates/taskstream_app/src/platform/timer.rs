use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use engine_logging::engine_debug;

/// Recurring reload check running on its own thread until stopped.
#[derive(Default)]
pub struct ReloadTimer {
    running: Option<(mpsc::Sender<()>, JoinHandle<()>)>,
}

impl ReloadTimer {
    /// (Re)starts the timer; `on_tick` runs once per `interval` until `stop`.
    pub fn start(&mut self, interval: Duration, on_tick: impl Fn() -> bool + Send + 'static) {
        self.stop();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if !on_tick() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        engine_debug!("Reload timer started, every {:?}", interval);
        self.running = Some((stop_tx, handle));
    }

    pub fn stop(&mut self) {
        if let Some((stop_tx, handle)) = self.running.take() {
            drop(stop_tx);
            let _ = handle.join();
            engine_debug!("Reload timer stopped");
        }
    }
}

impl Drop for ReloadTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
