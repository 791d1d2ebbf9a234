//! Reporting Thresholds and Classification Limits
//!
//! Deltas below which a new snapshot is not worth publishing. Chosen just
//! above the module's stated repeatability so that sensor noise alone does
//! not trigger reports.

// ===== REPORTING DELTAS =====

/// Minimum PM1.0 change worth reporting (µg/m³).
pub const PM1_0_THRESHOLD_UG_M3: f32 = 1.0;

/// Minimum PM2.5 change worth reporting (µg/m³).
pub const PM2_5_THRESHOLD_UG_M3: f32 = 1.0;

/// Minimum PM10.0 change worth reporting (µg/m³).
pub const PM10_0_THRESHOLD_UG_M3: f32 = 1.0;

/// Minimum CO₂ change worth reporting (ppm).
pub const CO2_THRESHOLD_PPM: f32 = 50.0;

/// Minimum VOC index change worth reporting.
pub const VOC_THRESHOLD: f32 = 10.0;

/// Minimum NOx index change worth reporting.
pub const NOX_THRESHOLD: f32 = 5.0;

/// Minimum temperature change worth reporting (°C).
pub const TEMPERATURE_THRESHOLD_C: f32 = 0.5;

/// Minimum relative humidity change worth reporting (%RH).
pub const HUMIDITY_THRESHOLD_PCT: f32 = 2.0;

// ===== AQI =====

/// Highest AQI value that still maps to a real level.
///
/// Source: US EPA AQI technical assistance document.
pub const AQI_MAX: i32 = 500;
