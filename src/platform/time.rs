//! Wall-clock time source

use crate::sim::Clock;

/// Milliseconds since the clock was created
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Milliseconds since the clock was created
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: f64,
}

#[cfg(target_arch = "wasm32")]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: js_sys::Date::now(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        (js_sys::Date::now() - self.start).max(0.0) as u64
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}
