//! Sensor Module Encoding and Measurement Spans
//!
//! The module reports every channel as a 16-bit integer with a fixed decimal
//! scale. One reserved value per channel type means "no valid value this
//! cycle" (sensor warming up, optional sensor not fitted).
//!
//! Source: Sensirion SEN6x datasheet, "Read Measured Values" command.

// ===== SENTINELS =====

/// Reserved raw value for signed channels (temperature, humidity, VOC, NOx).
pub const INVALID_I16: i16 = 0x7FFF;

/// Reserved raw value for unsigned channels (PM mass concentrations, CO₂).
pub const INVALID_U16: u16 = 0xFFFF;

// ===== SCALE FACTORS =====

/// Temperature is transmitted in 1/200 °C.
pub const TEMPERATURE_SCALE: f32 = 200.0;

/// Relative humidity is transmitted in 1/100 %RH.
pub const HUMIDITY_SCALE: f32 = 100.0;

/// Particulate mass concentrations are transmitted in 1/10 µg/m³.
pub const PM_SCALE: f32 = 10.0;

/// VOC and NOx indices are transmitted in 1/10 index points.
pub const GAS_INDEX_SCALE: f32 = 10.0;

/// CO₂ is transmitted directly in ppm.
pub const CO2_SCALE: f32 = 1.0;

// ===== MEASUREMENT SPANS =====

/// Lower bound of the particulate span (µg/m³), shared by all PM channels.
pub const PM_MIN_UG_M3: f32 = 0.0;

/// Upper bound of the particulate span (µg/m³), shared by all PM channels.
pub const PM_MAX_UG_M3: f32 = 1000.0;

/// Lower bound of the CO₂ span (ppm).
pub const CO2_MIN_PPM: f32 = 0.0;

/// Upper bound of the CO₂ span (ppm).
pub const CO2_MAX_PPM: f32 = 8192.0;

/// Lower bound of the VOC index.
pub const VOC_MIN: f32 = 0.0;

/// Upper bound of the VOC index.
pub const VOC_MAX: f32 = 500.0;

/// Lower bound of the NOx index.
pub const NOX_MIN: f32 = 0.0;

/// Upper bound of the NOx index.
pub const NOX_MAX: f32 = 500.0;

/// Lower bound of the documented temperature span (°C).
pub const TEMPERATURE_MIN_C: f32 = -40.0;

/// Upper bound of the documented temperature span (°C).
pub const TEMPERATURE_MAX_C: f32 = 85.0;

/// Lower bound of relative humidity (%RH).
pub const HUMIDITY_MIN_PCT: f32 = 0.0;

/// Upper bound of relative humidity (%RH).
pub const HUMIDITY_MAX_PCT: f32 = 100.0;
