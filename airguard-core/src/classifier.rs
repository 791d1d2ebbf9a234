//! Air Quality Classification
//!
//! ## Overview
//!
//! Reduces a snapshot to one [`AirQualityLevel`] from three opinions:
//!
//! 1. **CO₂**: an ordered ladder of upper bounds in ppm.
//! 2. **PM2.5** and **PM10**: US EPA AQI by piecewise-linear interpolation
//!    over a breakpoint table, then AQI bands to levels.
//! 3. **Aggregation**: the worst of the three.
//!
//! ## AQI Interpolation
//!
//! ```text
//! aqi = (C - conc_lo) / (conc_hi - conc_lo) * (aqi_hi - aqi_lo) + aqi_lo
//! ```
//!
//! using the first breakpoint with `C <= conc_hi`. The top bucket is open
//! ended (`conc_hi = f32::MAX`). A missing, `NaN` or negative concentration
//! has no AQI; a negative reading is never coerced to zero.
//!
//! ## Aggregation and `Unknown`
//!
//! Levels are compared through an explicit ordinal table, not through enum
//! discriminants. `Unknown` sits *above* `ExtremelyPoor` in that table, so
//! with [`UnknownPolicy::Dominates`] (the default) one channel that cannot be
//! classified outranks a real `ExtremelyPoor` from another channel. This is
//! kept for compatibility with deployed devices. [`UnknownPolicy::Abstains`]
//! treats `Unknown` as "no opinion" and is available as an explicit opt-in.

use core::fmt;

use crate::constants::thresholds::AQI_MAX;
use crate::measurement::Measurement;

/// Discrete air quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AirQualityLevel {
    /// Good
    Good,
    /// Fair
    Fair,
    /// Moderate
    Moderate,
    /// Poor
    Poor,
    /// Very poor
    VeryPoor,
    /// Extremely poor
    ExtremelyPoor,
    /// Could not classify
    Unknown,
}

/// Ordinal table used for "worst of" comparisons; index is the ordinal.
pub const LEVEL_ORDINALS: [AirQualityLevel; 7] = [
    AirQualityLevel::Good,
    AirQualityLevel::Fair,
    AirQualityLevel::Moderate,
    AirQualityLevel::Poor,
    AirQualityLevel::VeryPoor,
    AirQualityLevel::ExtremelyPoor,
    AirQualityLevel::Unknown,
];

impl AirQualityLevel {
    /// Position in [`LEVEL_ORDINALS`]; also the published wire value
    pub fn ordinal(self) -> u8 {
        LEVEL_ORDINALS
            .iter()
            .position(|&level| level == self)
            .map_or(u8::MAX, |idx| idx as u8)
    }

    /// Level for a wire value
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        LEVEL_ORDINALS.get(ordinal as usize).copied()
    }

    /// Worse of two levels by ordinal
    pub fn worst(self, other: Self) -> Self {
        if other.ordinal() > self.ordinal() {
            other
        } else {
            self
        }
    }

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "good",
            AirQualityLevel::Fair => "fair",
            AirQualityLevel::Moderate => "moderate",
            AirQualityLevel::Poor => "poor",
            AirQualityLevel::VeryPoor => "very_poor",
            AirQualityLevel::ExtremelyPoor => "extremely_poor",
            AirQualityLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AirQualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How `Unknown` takes part in aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnknownPolicy {
    /// Plain numeric maximum; `Unknown` outranks every real level
    #[default]
    Dominates,
    /// `Unknown` only when no channel produced a real level
    Abstains,
}

/// One segment of an AQI breakpoint table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiBreakpoint {
    /// Lowest concentration of the segment
    pub conc_lo: f32,
    /// Highest concentration of the segment
    pub conc_hi: f32,
    /// AQI at `conc_lo`
    pub aqi_lo: i32,
    /// AQI at `conc_hi`
    pub aqi_hi: i32,
}

impl AqiBreakpoint {
    const fn new(conc_lo: f32, conc_hi: f32, aqi_lo: i32, aqi_hi: i32) -> Self {
        Self { conc_lo, conc_hi, aqi_lo, aqi_hi }
    }
}

/// PM2.5 breakpoints (µg/m³ → AQI)
pub const PM25_BREAKPOINTS: [AqiBreakpoint; 6] = [
    AqiBreakpoint::new(0.0, 12.0, 0, 50),
    AqiBreakpoint::new(12.1, 35.4, 51, 100),
    AqiBreakpoint::new(35.5, 55.4, 101, 150),
    AqiBreakpoint::new(55.5, 150.4, 151, 200),
    AqiBreakpoint::new(150.5, 250.4, 201, 300),
    AqiBreakpoint::new(250.5, f32::MAX, 301, 500),
];

/// PM10 breakpoints (µg/m³ → AQI)
pub const PM10_BREAKPOINTS: [AqiBreakpoint; 6] = [
    AqiBreakpoint::new(0.0, 54.0, 0, 50),
    AqiBreakpoint::new(55.0, 154.0, 51, 100),
    AqiBreakpoint::new(155.0, 254.0, 101, 150),
    AqiBreakpoint::new(255.0, 354.0, 151, 200),
    AqiBreakpoint::new(355.0, 424.0, 201, 300),
    AqiBreakpoint::new(425.0, f32::MAX, 301, 500),
];

/// CO₂ ladder: first level whose upper bound (ppm) is ≥ the reading
pub const CO2_LADDER: [(f32, AirQualityLevel); 6] = [
    (600.0, AirQualityLevel::Good),
    (700.0, AirQualityLevel::Fair),
    (800.0, AirQualityLevel::Moderate),
    (950.0, AirQualityLevel::Poor),
    (1200.0, AirQualityLevel::VeryPoor),
    (u16::MAX as f32, AirQualityLevel::ExtremelyPoor),
];

/// Classify a CO₂ reading against [`CO2_LADDER`]
pub fn classify_co2(co2_ppm: Option<f32>) -> AirQualityLevel {
    let Some(co2) = co2_ppm.filter(|v| !v.is_nan()) else {
        return AirQualityLevel::Unknown;
    };

    CO2_LADDER
        .iter()
        .find(|(bound, _)| co2 <= *bound)
        .map_or(AirQualityLevel::Unknown, |&(_, level)| level)
}

/// Interpolate the AQI of a concentration
///
/// Returns `None` for a `NaN` or negative concentration, or when no
/// breakpoint covers it.
pub fn calculate_aqi(concentration: f32, breakpoints: &[AqiBreakpoint]) -> Option<f32> {
    if concentration.is_nan() || concentration < 0.0 {
        return None;
    }

    breakpoints
        .iter()
        .find(|bp| concentration <= bp.conc_hi)
        .map(|bp| {
            let ratio = (concentration - bp.conc_lo) / (bp.conc_hi - bp.conc_lo);
            ratio * (bp.aqi_hi - bp.aqi_lo) as f32 + bp.aqi_lo as f32
        })
}

/// Map an integer AQI to its band
pub fn aqi_to_level(aqi: i32) -> AirQualityLevel {
    match aqi {
        i32::MIN..=50 => AirQualityLevel::Good,
        51..=100 => AirQualityLevel::Fair,
        101..=150 => AirQualityLevel::Moderate,
        151..=200 => AirQualityLevel::Poor,
        201..=300 => AirQualityLevel::VeryPoor,
        301..=AQI_MAX => AirQualityLevel::ExtremelyPoor,
        _ => AirQualityLevel::Unknown,
    }
}

/// Round an interpolated AQI (`+0.5`, truncate) and map it; no AQI is `Unknown`
pub fn level_from_aqi(aqi: Option<f32>) -> AirQualityLevel {
    match aqi {
        Some(aqi) if !aqi.is_nan() => aqi_to_level((aqi + 0.5) as i32),
        _ => AirQualityLevel::Unknown,
    }
}

/// Per-channel view of one classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationBreakdown {
    /// Level from the CO₂ ladder
    pub co2: AirQualityLevel,
    /// Interpolated PM2.5 AQI
    pub pm2_5_aqi: Option<f32>,
    /// Level from the PM2.5 AQI
    pub pm2_5: AirQualityLevel,
    /// Interpolated PM10 AQI
    pub pm10_aqi: Option<f32>,
    /// Level from the PM10 AQI
    pub pm10: AirQualityLevel,
    /// Aggregated level
    pub overall: AirQualityLevel,
}

/// Aggregate channel levels under a policy
pub fn aggregate(levels: &[AirQualityLevel], policy: UnknownPolicy) -> AirQualityLevel {
    let candidates = levels.iter().copied().filter(|&level| match policy {
        UnknownPolicy::Dominates => true,
        UnknownPolicy::Abstains => level != AirQualityLevel::Unknown,
    });

    candidates
        .reduce(AirQualityLevel::worst)
        .unwrap_or(AirQualityLevel::Unknown)
}

/// Classifier over calibrated snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct AirQualityClassifier {
    policy: UnknownPolicy,
}

impl AirQualityClassifier {
    /// Classifier with an explicit `Unknown` policy
    pub const fn new(policy: UnknownPolicy) -> Self {
        Self { policy }
    }

    /// Active `Unknown` policy
    pub fn policy(&self) -> UnknownPolicy {
        self.policy
    }

    /// Overall level of a snapshot
    pub fn classify(&self, measurement: &Measurement) -> AirQualityLevel {
        self.breakdown(measurement).overall
    }

    /// Per-channel levels and AQI values of a snapshot
    pub fn breakdown(&self, measurement: &Measurement) -> ClassificationBreakdown {
        let co2 = classify_co2(measurement.co2);

        let pm2_5_aqi = measurement
            .pm2_5
            .and_then(|c| calculate_aqi(c, &PM25_BREAKPOINTS));
        let pm10_aqi = measurement
            .pm10_0
            .and_then(|c| calculate_aqi(c, &PM10_BREAKPOINTS));

        let pm2_5 = level_from_aqi(pm2_5_aqi);
        let pm10 = level_from_aqi(pm10_aqi);

        ClassificationBreakdown {
            co2,
            pm2_5_aqi,
            pm2_5,
            pm10_aqi,
            pm10,
            overall: aggregate(&[co2, pm2_5, pm10], self.policy),
        }
    }
}

/// Classify with the default policy; a missing snapshot is `Unknown`
pub fn classify(measurement: Option<&Measurement>) -> AirQualityLevel {
    measurement.map_or(AirQualityLevel::Unknown, |m| {
        AirQualityClassifier::default().classify(m)
    })
}
