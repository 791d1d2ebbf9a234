//! Error Types for the Measurement Pipeline
//!
//! ## Design Philosophy
//!
//! Errors here are returned from the tick handler of a small device, so they
//! follow the same rules as the rest of the core:
//!
//! 1. **Small and `Copy`**: no heap data, only `&'static str` reasons.
//! 2. **Never fatal**: a tick turns every failure into a logged outcome and
//!    the pipeline waits for the next tick.
//!
//! ## Error Categories
//!
//! - `TransportError`: the sensor read did not complete (bus error, timeout).
//! - `StorageError`: the baseline could not be loaded or saved.
//! - `ConfigError`: a configuration value can never work (zero window, ...).
//!
//! An unavailable channel is *not* an error. It is an absent value in the
//! [`Measurement`](crate::Measurement) and flows through the pipeline as such.

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Filter window outside `1..=max`
    #[error("Filter window {window} outside [1, {max}]")]
    InvalidWindow {
        /// Requested window size
        window: usize,
        /// Largest supported window
        max: usize,
    },

    /// Interval must be non-zero
    #[error("Interval {name} must be non-zero")]
    ZeroInterval {
        /// Which interval
        name: &'static str,
    },

    /// Poll interval longer than the read timeout
    #[error("Poll interval {poll_ms}ms exceeds read timeout {timeout_ms}ms")]
    PollExceedsTimeout {
        /// Configured poll interval
        poll_ms: u32,
        /// Configured read timeout
        timeout_ms: u32,
    },

    /// Reporting threshold negative or not a number
    #[error("Threshold for {channel} is not a finite non-negative value")]
    InvalidThreshold {
        /// Channel name
        channel: &'static str,
    },
}

/// Sensor transport failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Data-ready flag never set within the read timeout
    #[error("Timed out after {waited_ms}ms waiting for data-ready")]
    Timeout {
        /// Total time spent polling
        waited_ms: u32,
    },

    /// Bus-level failure (NACK, CRC mismatch, arbitration loss)
    #[error("Bus error: {reason}")]
    Bus {
        /// Driver-provided description
        reason: &'static str,
    },
}

/// Baseline persistence failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Backend could not be read
    #[error("Storage read failed: {reason}")]
    ReadFailed {
        /// Backend-provided description
        reason: &'static str,
    },

    /// Backend could not be written
    #[error("Storage write failed: {reason}")]
    WriteFailed {
        /// Backend-provided description
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidWindow { window, max } =>
                defmt::write!(fmt, "Window {} outside [1, {}]", window, max),
            Self::ZeroInterval { name } =>
                defmt::write!(fmt, "Interval {} is zero", name),
            Self::PollExceedsTimeout { poll_ms, timeout_ms } =>
                defmt::write!(fmt, "Poll {}ms > timeout {}ms", poll_ms, timeout_ms),
            Self::InvalidThreshold { channel } =>
                defmt::write!(fmt, "Bad threshold for {}", channel),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Timeout { waited_ms } =>
                defmt::write!(fmt, "Timeout after {}ms", waited_ms),
            Self::Bus { reason } =>
                defmt::write!(fmt, "Bus error: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ReadFailed { reason } =>
                defmt::write!(fmt, "Storage read: {}", reason),
            Self::WriteFailed { reason } =>
                defmt::write!(fmt, "Storage write: {}", reason),
        }
    }
}
