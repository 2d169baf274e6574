//! Periodic tick service and the CPU wait primitive.
//!
//! The ticker is the "periodic tick service" the power controller stops
//! in low-power mode: a detached thread that counts heartbeats at the
//! configured interval. It doubles as the [`PowerPort`] implementation,
//! since the wait primitive and the tick service are the two halves of
//! the power story.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::power::PowerPort;

/// Counting tick service backed by a detached thread.
pub struct Ticker {
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU32>,
    period_ms: u32,
}

impl Ticker {
    pub fn new(period_ms: u32) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            ticks: Arc::new(AtomicU32::new(0)),
            period_ms,
        }
    }

    /// Start ticking. Idempotent while already running.
    pub fn start(&mut self) {
        if self.running.load(Ordering::Acquire) {
            return;
        }
        // Fresh flag per generation: a previously stopped thread holds
        // the old one and exits on its next wakeup.
        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);
        let ticks = Arc::clone(&self.ticks);
        let period = Duration::from_millis(u64::from(self.period_ms));
        // detached: generation flag above ends the thread
        let _ = std::thread::spawn(move || {
            while running.load(Ordering::Acquire) {
                std::thread::sleep(period);
                if !running.load(Ordering::Acquire) {
                    break;
                }
                let n = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                log::trace!("tick {}", n);
            }
        });
    }

    /// Stop ticking; the thread exits on its next wakeup.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Heartbeats counted since construction.
    pub fn count(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl PowerPort for Ticker {
    fn tick_start(&mut self) {
        self.start();
    }

    fn tick_stop(&mut self) {
        self.stop();
    }

    fn wait_for_interrupt(&mut self) {
        // A blocked task hands the CPU to the idle task, which executes
        // the low-power wait until the periodic wake source fires again.
        // On hardware a received byte ends the wait immediately; the host
        // sleeps out the full period instead.
        std::thread::sleep(Duration::from_millis(u64::from(self.period_ms)));
    }
}
