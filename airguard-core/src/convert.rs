//! Raw count to physical unit conversion
//!
//! All sentinel handling happens here, once. A sentinel becomes `None` and
//! never reaches arithmetic; any other count is divided by the channel's
//! fixed scale. Absent channels are an expected condition (module warming up,
//! optional sensor not fitted) and never abort the pipeline.

use crate::constants::sensors::{
    CO2_SCALE, GAS_INDEX_SCALE, HUMIDITY_SCALE, INVALID_I16, INVALID_U16, PM_SCALE,
    TEMPERATURE_SCALE,
};
use crate::measurement::{Measurement, RawReading};

/// Decode a signed channel
#[inline]
pub fn decode_signed(raw: i16, scale: f32) -> Option<f32> {
    if raw == INVALID_I16 {
        None
    } else {
        Some(raw as f32 / scale)
    }
}

/// Decode an unsigned channel
#[inline]
pub fn decode_unsigned(raw: u16, scale: f32) -> Option<f32> {
    if raw == INVALID_U16 {
        None
    } else {
        Some(raw as f32 / scale)
    }
}

/// Convert one raw reading into calibrated units
pub fn convert(raw: &RawReading) -> Measurement {
    Measurement {
        temperature: decode_signed(raw.temperature, TEMPERATURE_SCALE),
        humidity: decode_signed(raw.humidity, HUMIDITY_SCALE),
        pm1_0: decode_unsigned(raw.pm1_0, PM_SCALE),
        pm2_5: decode_unsigned(raw.pm2_5, PM_SCALE),
        pm4_0: decode_unsigned(raw.pm4_0, PM_SCALE),
        pm10_0: decode_unsigned(raw.pm10_0, PM_SCALE),
        voc_index: decode_signed(raw.voc_index, GAS_INDEX_SCALE),
        nox_index: decode_signed(raw.nox_index, GAS_INDEX_SCALE),
        co2: decode_unsigned(raw.co2, CO2_SCALE),
    }
}

impl From<&RawReading> for Measurement {
    fn from(raw: &RawReading) -> Self {
        convert(raw)
    }
}

impl From<RawReading> for Measurement {
    fn from(raw: RawReading) -> Self {
        convert(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Channel;

    fn typical() -> RawReading {
        RawReading {
            temperature: 4500, // 22.5 °C
            humidity: 4250,    // 42.5 %RH
            pm1_0: 31,
            pm2_5: 52,
            pm4_0: 60,
            pm10_0: 75,
            voc_index: 1000,
            nox_index: 10,
            co2: 612,
        }
    }

    #[test]
    fn scales_each_channel() {
        let m = convert(&typical());
        assert_eq!(m.temperature, Some(22.5));
        assert_eq!(m.humidity, Some(42.5));
        assert_eq!(m.pm1_0, Some(3.1));
        assert_eq!(m.pm2_5, Some(5.2));
        assert_eq!(m.pm4_0, Some(6.0));
        assert_eq!(m.pm10_0, Some(7.5));
        assert_eq!(m.voc_index, Some(100.0));
        assert_eq!(m.nox_index, Some(1.0));
        assert_eq!(m.co2, Some(612.0));
    }

    #[test]
    fn negative_temperature() {
        let mut raw = typical();
        raw.temperature = -1000;
        assert_eq!(convert(&raw).temperature, Some(-5.0));
    }

    #[test]
    fn sentinel_only_affects_its_channel() {
        let mut raw = typical();
        raw.pm2_5 = INVALID_U16;
        raw.nox_index = INVALID_I16;

        let m = convert(&raw);
        let expected = convert(&typical());
        for channel in Channel::ALL {
            match channel {
                Channel::Pm2_5 | Channel::NoxIndex => assert_eq!(m.get(channel), None),
                _ => assert_eq!(m.get(channel), expected.get(channel)),
            }
        }
    }

    #[test]
    fn all_sentinels_is_unavailable() {
        assert_eq!(convert(&RawReading::INVALID), Measurement::UNAVAILABLE);
    }

    #[test]
    fn largest_valid_counts_are_not_sentinels() {
        assert_eq!(decode_unsigned(0xFFFE, CO2_SCALE), Some(65534.0));
        assert_eq!(decode_signed(0x7FFE, GAS_INDEX_SCALE), Some(3276.6));
    }
}
