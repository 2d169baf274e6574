//! Wakeup clock adapter.
//!
//! The board has no battery-backed calendar, so time-of-day is derived
//! from the monotonic clock since power-on; the wakeup counter advances
//! once per configured wakeup period. One implementation serves both
//! targets.

use std::time::Instant;

use crate::console::ports::{ClockPort, TimeOfDay};

pub struct WakeClock {
    boot: Instant,
    wakeup_secs: u32,
}

impl WakeClock {
    pub fn new(wakeup_secs: u32) -> Self {
        Self {
            boot: Instant::now(),
            // a zero period would stall the counter; clamp like the
            // config validator does
            wakeup_secs: wakeup_secs.max(1),
        }
    }
}

impl ClockPort for WakeClock {
    fn time_of_day(&self) -> TimeOfDay {
        let secs = self.boot.elapsed().as_secs();
        TimeOfDay {
            hours: ((secs / 3600) % 24) as u8,
            minutes: ((secs / 60) % 60) as u8,
            seconds: (secs % 60) as u8,
        }
    }

    fn wakeup_count(&self) -> u32 {
        (self.boot.elapsed().as_secs() / u64::from(self.wakeup_secs)) as u32
    }
}
