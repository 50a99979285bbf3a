//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time/ticks (periodic triggers fed by host deltas)
//! - Time source for seeding

pub mod clock;

pub use clock::{PeriodicTrigger, Scheduler, Trigger};

/// Milliseconds since the Unix epoch, used to seed runs
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch, used to seed runs
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
