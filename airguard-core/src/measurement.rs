//! Raw and calibrated measurement snapshots
//!
//! [`RawReading`] is what the transport hands over: one 16-bit count per
//! channel, sentinel-coded. [`Measurement`] is the calibrated snapshot the
//! rest of the pipeline works with. Every channel is an `Option<f32>`, so
//! "unavailable this cycle" is part of the type instead of a `NaN` that has
//! to be re-checked at each call site.

use crate::constants::sensors::{
    CO2_MAX_PPM, CO2_MIN_PPM, HUMIDITY_MAX_PCT, HUMIDITY_MIN_PCT, NOX_MAX, NOX_MIN,
    PM_MAX_UG_M3, PM_MIN_UG_M3, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C, VOC_MAX, VOC_MIN,
};
use heapless::Vec;

/// Number of channels in a snapshot
pub const CHANNEL_COUNT: usize = 9;

/// Physical channel of the sensor module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Ambient temperature
    Temperature,
    /// Relative humidity
    Humidity,
    /// PM1.0 mass concentration
    Pm1_0,
    /// PM2.5 mass concentration
    Pm2_5,
    /// PM4.0 mass concentration
    Pm4_0,
    /// PM10.0 mass concentration
    Pm10_0,
    /// VOC index
    VocIndex,
    /// NOx index
    NoxIndex,
    /// CO₂ concentration
    Co2,
}

impl Channel {
    /// All channels in record order
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Pm1_0,
        Channel::Pm2_5,
        Channel::Pm4_0,
        Channel::Pm10_0,
        Channel::VocIndex,
        Channel::NoxIndex,
        Channel::Co2,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Pm1_0 => "pm1_0",
            Channel::Pm2_5 => "pm2_5",
            Channel::Pm4_0 => "pm4_0",
            Channel::Pm10_0 => "pm10_0",
            Channel::VocIndex => "voc_index",
            Channel::NoxIndex => "nox_index",
            Channel::Co2 => "co2",
        }
    }

    /// Get unit of the calibrated value
    pub const fn unit(&self) -> &'static str {
        match self {
            Channel::Temperature => "°C",
            Channel::Humidity => "%RH",
            Channel::Pm1_0 | Channel::Pm2_5 | Channel::Pm4_0 | Channel::Pm10_0 => "μg/m³",
            Channel::VocIndex | Channel::NoxIndex => "",
            Channel::Co2 => "ppm",
        }
    }

    /// Documented measurement span `(min, max)` of the module for this channel
    pub const fn span(&self) -> (f32, f32) {
        match self {
            Channel::Temperature => (TEMPERATURE_MIN_C, TEMPERATURE_MAX_C),
            Channel::Humidity => (HUMIDITY_MIN_PCT, HUMIDITY_MAX_PCT),
            Channel::Pm1_0 | Channel::Pm2_5 | Channel::Pm4_0 | Channel::Pm10_0 => {
                (PM_MIN_UG_M3, PM_MAX_UG_M3)
            }
            Channel::VocIndex => (VOC_MIN, VOC_MAX),
            Channel::NoxIndex => (NOX_MIN, NOX_MAX),
            Channel::Co2 => (CO2_MIN_PPM, CO2_MAX_PPM),
        }
    }

    /// Whether this channel goes through a moving-average filter
    pub const fn is_smoothed(&self) -> bool {
        matches!(self, Channel::Pm1_0 | Channel::Pm2_5 | Channel::Pm10_0)
    }

    /// Whether this channel must be usable for a cycle to be evaluated
    ///
    /// PM4.0 is carried along but never gates reporting.
    pub const fn gates_reporting(&self) -> bool {
        !matches!(self, Channel::Pm4_0)
    }
}

/// Raw counts as delivered by the transport
///
/// Signed channels use `0x7FFF` and unsigned channels `0xFFFF` to mean
/// "no valid value this cycle".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    /// Temperature [°C × 200]
    pub temperature: i16,
    /// Relative humidity [%RH × 100]
    pub humidity: i16,
    /// PM1.0 [µg/m³ × 10]
    pub pm1_0: u16,
    /// PM2.5 [µg/m³ × 10]
    pub pm2_5: u16,
    /// PM4.0 [µg/m³ × 10]
    pub pm4_0: u16,
    /// PM10.0 [µg/m³ × 10]
    pub pm10_0: u16,
    /// VOC index [× 10]
    pub voc_index: i16,
    /// NOx index [× 10]
    pub nox_index: i16,
    /// CO₂ [ppm]
    pub co2: u16,
}

impl RawReading {
    /// A reading with every channel set to its sentinel
    pub const INVALID: RawReading = RawReading {
        temperature: crate::constants::INVALID_I16,
        humidity: crate::constants::INVALID_I16,
        pm1_0: crate::constants::INVALID_U16,
        pm2_5: crate::constants::INVALID_U16,
        pm4_0: crate::constants::INVALID_U16,
        pm10_0: crate::constants::INVALID_U16,
        voc_index: crate::constants::INVALID_I16,
        nox_index: crate::constants::INVALID_I16,
        co2: crate::constants::INVALID_U16,
    };
}

/// Calibrated snapshot of all channels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Temperature [°C]
    pub temperature: Option<f32>,
    /// Relative humidity [%RH]
    pub humidity: Option<f32>,
    /// PM1.0 [µg/m³]
    pub pm1_0: Option<f32>,
    /// PM2.5 [µg/m³]
    pub pm2_5: Option<f32>,
    /// PM4.0 [µg/m³]
    pub pm4_0: Option<f32>,
    /// PM10.0 [µg/m³]
    pub pm10_0: Option<f32>,
    /// VOC index
    pub voc_index: Option<f32>,
    /// NOx index
    pub nox_index: Option<f32>,
    /// CO₂ [ppm]
    pub co2: Option<f32>,
}

impl Measurement {
    /// Every channel present and zero; the bootstrap baseline
    pub const ZERO: Measurement = Measurement {
        temperature: Some(0.0),
        humidity: Some(0.0),
        pm1_0: Some(0.0),
        pm2_5: Some(0.0),
        pm4_0: Some(0.0),
        pm10_0: Some(0.0),
        voc_index: Some(0.0),
        nox_index: Some(0.0),
        co2: Some(0.0),
    };

    /// Every channel absent
    pub const UNAVAILABLE: Measurement = Measurement {
        temperature: None,
        humidity: None,
        pm1_0: None,
        pm2_5: None,
        pm4_0: None,
        pm10_0: None,
        voc_index: None,
        nox_index: None,
        co2: None,
    };

    /// Value of one channel
    pub fn get(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Pm1_0 => self.pm1_0,
            Channel::Pm2_5 => self.pm2_5,
            Channel::Pm4_0 => self.pm4_0,
            Channel::Pm10_0 => self.pm10_0,
            Channel::VocIndex => self.voc_index,
            Channel::NoxIndex => self.nox_index,
            Channel::Co2 => self.co2,
        }
    }

    /// Replace the value of one channel
    pub fn set(&mut self, channel: Channel, value: Option<f32>) {
        let slot = match channel {
            Channel::Temperature => &mut self.temperature,
            Channel::Humidity => &mut self.humidity,
            Channel::Pm1_0 => &mut self.pm1_0,
            Channel::Pm2_5 => &mut self.pm2_5,
            Channel::Pm4_0 => &mut self.pm4_0,
            Channel::Pm10_0 => &mut self.pm10_0,
            Channel::VocIndex => &mut self.voc_index,
            Channel::NoxIndex => &mut self.nox_index,
            Channel::Co2 => &mut self.co2,
        };
        *slot = value;
    }

    /// Iterate `(channel, value)` pairs in record order
    pub fn channels(&self) -> impl Iterator<Item = (Channel, Option<f32>)> + '_ {
        Channel::ALL.iter().map(move |&channel| (channel, self.get(channel)))
    }

    /// First reporting channel that is absent or not a finite number
    ///
    /// `None` means the snapshot is complete and usable for comparisons.
    /// Channels that do not [gate reporting](Channel::gates_reporting) are
    /// not checked.
    pub fn first_unusable(&self) -> Option<Channel> {
        self.channels()
            .filter(|(channel, _)| channel.gates_reporting())
            .find(|(_, value)| !value.map_or(false, f32::is_finite))
            .map(|(channel, _)| channel)
    }

    /// Whether every reporting channel holds a finite value
    pub fn is_complete(&self) -> bool {
        self.first_unusable().is_none()
    }

    /// Present channels whose value lies outside the module's documented span
    pub fn out_of_range_channels(&self) -> Vec<Channel, CHANNEL_COUNT> {
        let mut out = Vec::new();
        for (channel, value) in self.channels() {
            if let Some(value) = value {
                let (min, max) = channel.span();
                if value < min || value > max {
                    // Capacity equals the channel count, push cannot fail.
                    let _ = out.push(channel);
                }
            }
        }
        out
    }
}
