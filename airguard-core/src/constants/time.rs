//! Time-Related Constants
//!
//! Scheduling and polling intervals for the measurement cycle.

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Default interval between pipeline ticks (milliseconds).
///
/// The module produces a new sample every second; five seconds keeps the
/// particulate filter window at 25 s of history with the default window.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5 * MS_PER_SECOND;

/// Low-power tick interval (milliseconds).
pub const LOW_POWER_TICK_INTERVAL_MS: u64 = 60 * MS_PER_SECOND;

/// Default delay between data-ready polls (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 50;

/// Default total time to wait for data-ready before giving up (milliseconds).
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 500;
