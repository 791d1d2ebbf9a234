//! Sensor transport and delay traits
//!
//! Reads follow the `nb` model: `WouldBlock` means the module has not set
//! its data-ready flag yet, and the caller decides how long to keep polling
//! (see [`read_measurement`](crate::transport::read_measurement)).
//!
//! ```rust
//! use airguard_core::traits::Transport;
//! use airguard_core::{RawReading, TransportError};
//!
//! struct AlwaysReady;
//!
//! impl Transport for AlwaysReady {
//!     fn read_raw(&mut self) -> nb::Result<RawReading, TransportError> {
//!         Ok(RawReading::INVALID)
//!     }
//! }
//! ```

use crate::errors::TransportError;
use crate::measurement::RawReading;

/// Source of raw sensor readings
pub trait Transport {
    /// Try to read one raw reading
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while no fresh data is available.
    /// Bus failures are reported as [`TransportError::Bus`].
    fn read_raw(&mut self) -> nb::Result<RawReading, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read_raw(&mut self) -> nb::Result<RawReading, TransportError> {
        (**self).read_raw()
    }
}

/// Blocking millisecond delay
pub trait Delay {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Delay backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
