//! Time source for timed transitions (pause duration, spawn delay)

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic millisecond clock injected into the session
pub trait Clock: Send {
    fn now_ms(&self) -> u64;
}

/// A clock that only moves when told to. Clones share the same time, so a
/// test (or the headless runner) can keep a handle after giving one away.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        let boxed: Box<dyn Clock> = Box::new(clock);

        handle.advance(50);
        assert_eq!(boxed.now_ms(), 150);
        handle.set(10);
        assert_eq!(boxed.now_ms(), 10);
    }
}
