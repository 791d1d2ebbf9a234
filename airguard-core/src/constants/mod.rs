//! Constants for AirGuard Core
//!
//! Every numeric value the pipeline depends on lives here, grouped by
//! domain, with units in the name and the source documented alongside.
//!
//! ## Organization
//!
//! - **Sensors**: raw encoding of the module (sentinels, scale factors) and
//!   its documented measurement spans
//! - **Thresholds**: reporting deltas and classification ladders
//! - **Time**: tick, poll and timeout intervals

/// Raw encoding and measurement spans of the sensor module.
pub mod sensors;

/// Reporting thresholds and classification tables.
pub mod thresholds;

/// Scheduling and polling intervals.
pub mod time;

pub use sensors::{INVALID_I16, INVALID_U16};

pub use thresholds::{
    CO2_THRESHOLD_PPM, HUMIDITY_THRESHOLD_PCT, NOX_THRESHOLD, PM10_0_THRESHOLD_UG_M3,
    PM1_0_THRESHOLD_UG_M3, PM2_5_THRESHOLD_UG_M3, TEMPERATURE_THRESHOLD_C, VOC_THRESHOLD,
};

pub use time::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_READ_TIMEOUT_MS, DEFAULT_TICK_INTERVAL_MS,
};
