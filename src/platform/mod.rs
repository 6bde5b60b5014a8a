//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (`SystemClock`)
//! - Input handoff from event callbacks to the tick (`InputQueue`)
//! - Logger setup

pub mod input;
pub mod time;

pub use input::{InputQueue, InputSender};
pub use time::SystemClock;

/// Install the logger for this target. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Install the logger for this target. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
