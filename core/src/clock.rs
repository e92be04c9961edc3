//! Time source for every timestamp the economy writes
//!
//! All records store unix seconds. Production code uses [`SystemClock`];
//! tests drive time forward explicitly with [`ManualClock`].

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::constants::SECS_PER_HOUR;

pub trait Clock: Send + Sync {
    /// Current unix timestamp in seconds
    fn now(&self) -> i64;
}

pub type SharedClock = Arc<dyn Clock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<i64>,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, timestamp: i64) {
        *self.now.lock() = timestamp;
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock() += secs;
    }

    pub fn advance_hours(&self, hours: f64) {
        let secs = (hours * SECS_PER_HOUR as f64).round() as i64;
        self.advance_secs(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        *self.now.lock()
    }
}
