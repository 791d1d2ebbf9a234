//! Measurement-to-decision core for AirGuard
//!
//! Turns raw counts from a multi-sensor air-quality module into calibrated
//! values, smooths the particulate channels, classifies air quality and
//! decides when a change is worth publishing.
//!
//! Key constraints:
//! - `no_std` capable, no heap allocation
//! - One non-reentrant tick at a time
//! - Unavailable channels are values (`None`), not errors
//!
//! ```no_run
//! use airguard_core::{convert, classify, RawReading};
//!
//! let raw = RawReading {
//!     temperature: 4500, humidity: 4000,
//!     pm1_0: 30, pm2_5: 52, pm4_0: 60, pm10_0: 75,
//!     voc_index: 1000, nox_index: 10, co2: 612,
//! };
//! let measurement = convert(&raw);
//! let level = classify(Some(&measurement));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod baseline;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod convert;
pub mod errors;
pub mod filter;
pub mod measurement;
pub mod pipeline;
pub mod policy;
pub mod traits;
pub mod transport;

// Public API
pub use classifier::{classify, AirQualityClassifier, AirQualityLevel, UnknownPolicy};
pub use config::PipelineConfig;
pub use convert::convert;
pub use errors::{ConfigError, ConfigResult, StorageError, TransportError};
pub use filter::{MovingAverage, ParticulateFilters};
pub use measurement::{Channel, Measurement, RawReading};
pub use pipeline::{Pipeline, PipelineStats, TickOutcome};
pub use policy::{should_report, Decision, ReportThresholds, ReportingPolicy};
pub use traits::{BaselineStore, Delay, Publisher, Transport};
pub use transport::read_measurement;

#[cfg(feature = "std")]
pub use traits::StdDelay;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
