//! Pipeline configuration
//!
//! All tunables of one pipeline in a single value. Every field has a
//! default, so a partial JSON document (see the connectors crate) fills in
//! the rest.
//!
//! ```rust
//! use airguard_core::PipelineConfig;
//!
//! let config = PipelineConfig::default()
//!     .with_tick_interval_ms(10_000)
//!     .with_filter_window(8);
//! assert!(config.validate().is_ok());
//! ```

use crate::classifier::UnknownPolicy;
use crate::constants::time::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_READ_TIMEOUT_MS, DEFAULT_TICK_INTERVAL_MS,
    LOW_POWER_TICK_INTERVAL_MS,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::filter::{DEFAULT_FILTER_WINDOW, MAX_FILTER_WINDOW};
use crate::policy::ReportThresholds;

/// Tunables of a pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Period between ticks (ms)
    pub tick_interval_ms: u64,
    /// Total time to wait for data-ready per read (ms)
    pub read_timeout_ms: u32,
    /// Delay between data-ready polls (ms)
    pub poll_interval_ms: u32,
    /// Moving-average window of the PM filters (samples)
    pub filter_window: usize,
    /// Reporting thresholds
    pub thresholds: ReportThresholds,
    /// How `Unknown` takes part in level aggregation
    pub unknown_policy: UnknownPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            filter_window: DEFAULT_FILTER_WINDOW,
            thresholds: ReportThresholds::default(),
            unknown_policy: UnknownPolicy::Dominates,
        }
    }
}

impl PipelineConfig {
    /// Battery-friendly preset: one tick per minute, shorter filter
    pub fn low_power() -> Self {
        Self {
            tick_interval_ms: LOW_POWER_TICK_INTERVAL_MS,
            filter_window: 3,
            ..Self::default()
        }
    }

    /// Set the tick interval
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set read timeout and poll interval
    pub fn with_read_timing(mut self, timeout_ms: u32, poll_interval_ms: u32) -> Self {
        self.read_timeout_ms = timeout_ms;
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the PM filter window
    pub fn with_filter_window(mut self, window: usize) -> Self {
        self.filter_window = window;
        self
    }

    /// Set the reporting thresholds
    pub fn with_thresholds(mut self, thresholds: ReportThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the `Unknown` aggregation policy
    pub fn with_unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    /// Check that the configuration can work
    pub fn validate(&self) -> ConfigResult<()> {
        if self.filter_window == 0 || self.filter_window > MAX_FILTER_WINDOW {
            return Err(ConfigError::InvalidWindow {
                window: self.filter_window,
                max: MAX_FILTER_WINDOW,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "tick_interval_ms" });
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "read_timeout_ms" });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "poll_interval_ms" });
        }
        if self.poll_interval_ms > self.read_timeout_ms {
            return Err(ConfigError::PollExceedsTimeout {
                poll_ms: self.poll_interval_ms,
                timeout_ms: self.read_timeout_ms,
            });
        }
        self.thresholds.validate()
    }
}
