//! Persisted last-published baseline
//!
//! The baseline is stored as one fixed-size blob under namespace
//! [`BASELINE_NAMESPACE`], key [`BASELINE_KEY`]:
//!
//! ```text
//! offset  0        4        8       12       16       20       24       28       32
//!        ┌────────┬────────┬────────┬────────┬────────┬────────┬────────┬────────┬────────┐
//!        │ temp   │ hum    │ pm1_0  │ pm2_5  │ pm4_0  │ pm10_0 │ voc    │ nox    │ co2    │
//!        └────────┴────────┴────────┴────────┴────────┴────────┴────────┴────────┴────────┘
//!          f32 little-endian each, absent channel stored as NaN
//! ```
//!
//! Absent is always written as the canonical quiet NaN. Any NaN read back is
//! absent, so a record from another writer with a different NaN payload is
//! normalised on the next save.
//!
//! A missing blob, a blob of any other length, or a failing store all yield
//! the all-zero baseline. The device then reports on its first complete
//! reading.

use crate::errors::StorageError;
use crate::measurement::{Channel, Measurement, CHANNEL_COUNT};
use crate::traits::BaselineStore;

/// Storage namespace of the baseline
pub const BASELINE_NAMESPACE: &str = "airguard";

/// Storage key of the baseline
pub const BASELINE_KEY: &str = "last_pub";

/// Encoded size in bytes
pub const BASELINE_RECORD_LEN: usize = CHANNEL_COUNT * 4;

/// Encode a snapshot into the fixed record layout
pub fn encode(measurement: &Measurement) -> [u8; BASELINE_RECORD_LEN] {
    let mut record = [0u8; BASELINE_RECORD_LEN];
    for (slot, (_, value)) in record.chunks_exact_mut(4).zip(measurement.channels()) {
        slot.copy_from_slice(&value.unwrap_or(f32::NAN).to_le_bytes());
    }
    record
}

/// Decode a record; anything but exactly [`BASELINE_RECORD_LEN`] bytes is zero
pub fn decode(bytes: &[u8]) -> Measurement {
    if bytes.len() != BASELINE_RECORD_LEN {
        return Measurement::ZERO;
    }

    let mut measurement = Measurement::UNAVAILABLE;
    for (chunk, channel) in bytes.chunks_exact(4).zip(Channel::ALL) {
        let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        measurement.set(channel, (!value.is_nan()).then_some(value));
    }
    measurement
}

/// Load the baseline, falling back to zero
///
/// Store failures are logged and treated like an empty store.
pub fn load<S: BaselineStore + ?Sized>(store: &mut S) -> Measurement {
    // One spare byte so an oversized blob is seen as oversized
    let mut buf = [0u8; BASELINE_RECORD_LEN + 1];

    match store.get(BASELINE_NAMESPACE, BASELINE_KEY, &mut buf) {
        Ok(Some(len)) if len == BASELINE_RECORD_LEN => decode(&buf[..len]),
        Ok(Some(_len)) => {
            log_warn!(
                "Ignoring stored baseline of {} bytes (expected {})",
                _len,
                BASELINE_RECORD_LEN
            );
            Measurement::ZERO
        }
        Ok(None) => Measurement::ZERO,
        Err(_err) => {
            log_warn!("Baseline load failed: {}", _err);
            Measurement::ZERO
        }
    }
}

/// Persist a baseline
pub fn save<S: BaselineStore + ?Sized>(
    store: &mut S,
    measurement: &Measurement,
) -> Result<(), StorageError> {
    store.set(BASELINE_NAMESPACE, BASELINE_KEY, &encode(measurement))
}
