//! Time sources.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic timestamp source, in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall-clock time (unix seconds), never reported going backwards
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wall-clock reading, holding at the latest one seen
    fn observe(&self, wall: u64) -> u64 {
        self.last.fetch_max(wall, Ordering::SeqCst).max(wall)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        self.observe(Utc::now().timestamp().max(0) as u64)
    }
}

/// Simulated time, moved forward explicitly (for timeout testing)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Start at the current wall-clock time
    pub fn starting_now() -> Self {
        Self::new(SystemClock::new().now())
    }

    /// Advance simulated time by seconds, returning the new time
    pub fn advance(&self, seconds: u64) -> u64 {
        self.now.fetch_add(seconds, Ordering::SeqCst) + seconds
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
