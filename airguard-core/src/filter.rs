//! Fixed-Window Moving Average for Particulate Channels
//!
//! ## Overview
//!
//! Optical particle counters are noisy from one sample to the next. Each PM
//! channel runs through its own [`MovingAverage`] before classification and
//! change detection, so a single spike does not trigger a report on its own.
//!
//! ## Algorithm
//!
//! A ring of `N` slots, all starting at zero, plus a running sum:
//!
//! ```text
//! MovingAverage window = 5, after 7 samples:
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │ s5  │ s6  │ s2  │ s3  │ s4  │
//! └─────┴─────┴─────┴─────┴─────┘
//!              ↑
//!              └── write_pos = 2 (next slot to evict)
//!
//! add_sample(x):  sum += x - slot[write_pos]
//!                 slot[write_pos] = x
//!                 write_pos = (write_pos + 1) % N
//!                 return sum / N
//! ```
//!
//! The divisor is always `N`. Until `N` samples have been seen the unseen
//! slots still count as zero, so warm-up outputs ramp up from below (feeding
//! a constant 10 into a window of 5 yields 2, 4, 6, 8, 10). That startup
//! transient is part of the contract and is not special-cased.
//!
//! ## Usage Example
//!
//! ```rust
//! use airguard_core::filter::MovingAverage;
//!
//! let mut pm25 = MovingAverage::new(5)?;
//! assert_eq!(pm25.add_sample(10.0), 2.0);
//! # Ok::<(), airguard_core::ConfigError>(())
//! ```

use crate::errors::{ConfigError, ConfigResult};
use heapless::Vec;

/// Largest supported window
pub const MAX_FILTER_WINDOW: usize = 32;

/// Default window, in samples
pub const DEFAULT_FILTER_WINDOW: usize = 5;

/// Moving average over the last `window` samples
///
/// ## Internal Invariants
///
/// - `slots.len() == window` and `1 <= window <= MAX_FILTER_WINDOW`
/// - `write_pos < window`
/// - `sum` is the running total of `slots`
#[derive(Debug, Clone)]
pub struct MovingAverage {
    slots: Vec<f32, MAX_FILTER_WINDOW>,
    write_pos: usize,
    sum: f32,
    seen: u32,
}

impl MovingAverage {
    /// Create a filter with the given window
    ///
    /// A window of zero (or above [`MAX_FILTER_WINDOW`]) is rejected.
    pub fn new(window: usize) -> ConfigResult<Self> {
        if window == 0 || window > MAX_FILTER_WINDOW {
            return Err(ConfigError::InvalidWindow {
                window,
                max: MAX_FILTER_WINDOW,
            });
        }

        let mut slots = Vec::new();
        slots
            .resize(window, 0.0)
            .map_err(|_| ConfigError::InvalidWindow { window, max: MAX_FILTER_WINDOW })?;

        Ok(Self {
            slots,
            write_pos: 0,
            sum: 0.0,
            seen: 0,
        })
    }

    /// Add a sample and return the mean of the window
    pub fn add_sample(&mut self, sample: f32) -> f32 {
        let evicted = self.slots[self.write_pos];
        self.slots[self.write_pos] = sample;
        self.sum += sample - evicted;
        self.write_pos = (self.write_pos + 1) % self.slots.len();
        self.seen = self.seen.saturating_add(1);

        self.sum / self.slots.len() as f32
    }

    /// Window size in samples
    pub fn window(&self) -> usize {
        self.slots.len()
    }

    /// Whether the window has been filled at least once
    pub fn is_warmed_up(&self) -> bool {
        self.seen as usize >= self.slots.len()
    }

    /// Samples seen since creation or the last reset (saturating)
    pub fn samples_seen(&self) -> u32 {
        self.seen
    }

    /// Forget all samples
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = 0.0);
        self.write_pos = 0;
        self.sum = 0.0;
        self.seen = 0;
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self {
            slots: Vec::from_slice(&[0.0; DEFAULT_FILTER_WINDOW]).unwrap_or_default(),
            write_pos: 0,
            sum: 0.0,
            seen: 0,
        }
    }
}

/// One independent filter per smoothed particulate channel
#[derive(Debug, Clone)]
pub struct ParticulateFilters {
    /// PM1.0 filter
    pub pm1_0: MovingAverage,
    /// PM2.5 filter
    pub pm2_5: MovingAverage,
    /// PM10.0 filter
    pub pm10_0: MovingAverage,
}

impl ParticulateFilters {
    /// Create three filters sharing one window size
    pub fn new(window: usize) -> ConfigResult<Self> {
        Ok(Self {
            pm1_0: MovingAverage::new(window)?,
            pm2_5: MovingAverage::new(window)?,
            pm10_0: MovingAverage::new(window)?,
        })
    }

    /// Smooth the PM channels of a snapshot, passing every other channel through
    ///
    /// An absent PM value is not fed to its filter. The smoothed channel stays
    /// absent for this cycle and the filter keeps its state.
    pub fn smooth(&mut self, raw: &crate::Measurement) -> crate::Measurement {
        let mut smoothed = *raw;
        smoothed.pm1_0 = raw.pm1_0.map(|x| self.pm1_0.add_sample(x));
        smoothed.pm2_5 = raw.pm2_5.map(|x| self.pm2_5.add_sample(x));
        smoothed.pm10_0 = raw.pm10_0.map(|x| self.pm10_0.add_sample(x));
        smoothed
    }

    /// Reset all three filters
    pub fn reset(&mut self) {
        self.pm1_0.reset();
        self.pm2_5.reset();
        self.pm10_0.reset();
    }
}
