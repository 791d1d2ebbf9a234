//! Change-detection reporting policy
//!
//! A smoothed snapshot is only worth publishing when it differs enough from
//! the last snapshot that was published. The policy owns that baseline and
//! compares each channel against a fixed absolute threshold:
//!
//! | Channel     | Threshold |
//! |-------------|-----------|
//! | PM1.0       | 1.0 µg/m³ |
//! | PM2.5       | 1.0 µg/m³ |
//! | PM10.0      | 1.0 µg/m³ |
//! | CO₂         | 50 ppm    |
//! | VOC index   | 10        |
//! | NOx index   | 5         |
//! | Temperature | 0.5 °C    |
//! | Humidity    | 2 %RH     |
//!
//! PM4.0 has no threshold. It never triggers a report on its own and its
//! absence never blocks one.
//!
//! A delta must be *strictly* greater than its threshold. Before any delta is
//! computed the snapshot must be complete: one absent or non-finite
//! thresholded channel rejects the whole cycle and leaves the baseline alone.

use libm::fabsf;

use crate::constants::thresholds::{
    CO2_THRESHOLD_PPM, HUMIDITY_THRESHOLD_PCT, NOX_THRESHOLD, PM10_0_THRESHOLD_UG_M3,
    PM1_0_THRESHOLD_UG_M3, PM2_5_THRESHOLD_UG_M3, TEMPERATURE_THRESHOLD_C, VOC_THRESHOLD,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::measurement::{Channel, Measurement, CHANNEL_COUNT};

/// Per-channel absolute reporting thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReportThresholds {
    /// PM1.0 [µg/m³]
    pub pm1_0: f32,
    /// PM2.5 [µg/m³]
    pub pm2_5: f32,
    /// PM10.0 [µg/m³]
    pub pm10_0: f32,
    /// CO₂ [ppm]
    pub co2: f32,
    /// VOC index
    pub voc_index: f32,
    /// NOx index
    pub nox_index: f32,
    /// Temperature [°C]
    pub temperature: f32,
    /// Relative humidity [%RH]
    pub humidity: f32,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            pm1_0: PM1_0_THRESHOLD_UG_M3,
            pm2_5: PM2_5_THRESHOLD_UG_M3,
            pm10_0: PM10_0_THRESHOLD_UG_M3,
            co2: CO2_THRESHOLD_PPM,
            voc_index: VOC_THRESHOLD,
            nox_index: NOX_THRESHOLD,
            temperature: TEMPERATURE_THRESHOLD_C,
            humidity: HUMIDITY_THRESHOLD_PCT,
        }
    }
}

impl ReportThresholds {
    /// Threshold for a channel; `None` for channels that never trigger
    pub fn threshold(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::Temperature => Some(self.temperature),
            Channel::Humidity => Some(self.humidity),
            Channel::Pm1_0 => Some(self.pm1_0),
            Channel::Pm2_5 => Some(self.pm2_5),
            Channel::Pm4_0 => None,
            Channel::Pm10_0 => Some(self.pm10_0),
            Channel::VocIndex => Some(self.voc_index),
            Channel::NoxIndex => Some(self.nox_index),
            Channel::Co2 => Some(self.co2),
        }
    }

    /// Reject negative or non-finite thresholds
    pub fn validate(&self) -> ConfigResult<()> {
        for channel in Channel::ALL {
            if let Some(t) = self.threshold(channel) {
                if !t.is_finite() || t < 0.0 {
                    return Err(ConfigError::InvalidThreshold { channel: channel.name() });
                }
            }
        }
        Ok(())
    }
}

/// Absolute change of one channel against the baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelDelta {
    /// Channel
    pub channel: Channel,
    /// `|current - baseline|`
    pub delta: f32,
    /// Threshold the delta was compared against
    pub threshold: f32,
}

impl ChannelDelta {
    /// Whether this channel alone would trigger a report
    pub fn exceeds(&self) -> bool {
        self.delta > self.threshold
    }
}

/// Deltas of every thresholded channel for one cycle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelDeltas {
    deltas: heapless::Vec<ChannelDelta, CHANNEL_COUNT>,
}

impl ChannelDeltas {
    /// Compute deltas of `current` against `baseline`
    ///
    /// A channel with no threshold, or with an absent value on either side,
    /// is left out.
    pub fn between(
        current: &Measurement,
        baseline: &Measurement,
        thresholds: &ReportThresholds,
    ) -> Self {
        let mut deltas = heapless::Vec::new();
        for channel in Channel::ALL {
            let Some(threshold) = thresholds.threshold(channel) else {
                continue;
            };
            if let (Some(now), Some(then)) = (current.get(channel), baseline.get(channel)) {
                // At most one entry per channel
                let _ = deltas.push(ChannelDelta {
                    channel,
                    delta: fabsf(now - then),
                    threshold,
                });
            }
        }
        Self { deltas }
    }

    /// All deltas in channel order
    pub fn iter(&self) -> impl Iterator<Item = &ChannelDelta> {
        self.deltas.iter()
    }

    /// Deltas that exceed their threshold
    pub fn exceeded(&self) -> impl Iterator<Item = &ChannelDelta> {
        self.deltas.iter().filter(|d| d.exceeds())
    }

    /// Delta of one channel, if computed
    pub fn get(&self, channel: Channel) -> Option<f32> {
        self.deltas.iter().find(|d| d.channel == channel).map(|d| d.delta)
    }

    /// Whether any channel exceeds its threshold
    pub fn any_exceeded(&self) -> bool {
        self.exceeded().next().is_some()
    }
}

/// Outcome of evaluating one smoothed snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// At least one channel moved past its threshold
    Report(ChannelDeltas),
    /// Nothing moved enough
    WithinThresholds,
    /// Snapshot incomplete; first offending channel
    Rejected(Channel),
}

impl Decision {
    /// Whether the decision asks for a publish
    pub fn should_report(&self) -> bool {
        matches!(self, Decision::Report(_))
    }
}

/// Policy state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PolicyState {
    /// Waiting for the next snapshot
    #[default]
    Idle,
    /// Comparing a snapshot against the baseline
    Evaluating,
}

/// Whether `current` differs enough from `baseline` to publish
pub fn should_report(
    current: &Measurement,
    baseline: &Measurement,
    thresholds: &ReportThresholds,
) -> bool {
    current.is_complete() && ChannelDeltas::between(current, baseline, thresholds).any_exceeded()
}

/// Reporting policy holding the last-published baseline
#[derive(Debug, Clone)]
pub struct ReportingPolicy {
    baseline: Measurement,
    thresholds: ReportThresholds,
    state: PolicyState,
}

impl ReportingPolicy {
    /// Policy starting from a restored (or zero) baseline
    pub fn new(baseline: Measurement, thresholds: ReportThresholds) -> Self {
        Self {
            baseline,
            thresholds,
            state: PolicyState::Idle,
        }
    }

    /// Compare a smoothed snapshot against the baseline
    pub fn evaluate(&mut self, current: &Measurement) -> Decision {
        self.state = PolicyState::Evaluating;

        let decision = match current.first_unusable() {
            Some(channel) => Decision::Rejected(channel),
            None => {
                let deltas = ChannelDeltas::between(current, &self.baseline, &self.thresholds);
                if deltas.any_exceeded() {
                    Decision::Report(deltas)
                } else {
                    Decision::WithinThresholds
                }
            }
        };

        self.state = PolicyState::Idle;
        decision
    }

    /// Adopt a published snapshot as the new baseline
    pub fn on_published(&mut self, published: Measurement) {
        self.baseline = published;
    }

    /// Current baseline
    pub fn baseline(&self) -> &Measurement {
        &self.baseline
    }

    /// Active thresholds
    pub fn thresholds(&self) -> &ReportThresholds {
        &self.thresholds
    }

    /// Replace thresholds; the baseline is kept
    pub fn set_thresholds(&mut self, thresholds: ReportThresholds) {
        self.thresholds = thresholds;
    }

    /// Current state
    pub fn state(&self) -> PolicyState {
        self.state
    }
}

impl Default for ReportingPolicy {
    fn default() -> Self {
        Self::new(Measurement::ZERO, ReportThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady() -> Measurement {
        Measurement {
            temperature: Some(21.0),
            humidity: Some(40.0),
            pm1_0: Some(3.0),
            pm2_5: Some(5.0),
            pm4_0: Some(6.0),
            pm10_0: Some(8.0),
            voc_index: Some(100.0),
            nox_index: Some(1.0),
            co2: Some(600.0),
        }
    }

    #[test]
    fn small_change_from_zero_does_not_report() {
        let mut current = Measurement::ZERO;
        current.pm2_5 = Some(0.5);

        let mut policy = ReportingPolicy::default();
        assert_eq!(policy.evaluate(&current), Decision::WithinThresholds);
        assert_eq!(policy.baseline(), &Measurement::ZERO);
    }

    #[test]
    fn change_past_threshold_reports() {
        let mut current = Measurement::ZERO;
        current.pm2_5 = Some(1.1);

        let mut policy = ReportingPolicy::default();
        let Decision::Report(deltas) = policy.evaluate(&current) else {
            panic!("expected a report");
        };
        let exceeded: heapless::Vec<Channel, CHANNEL_COUNT> =
            deltas.exceeded().map(|d| d.channel).collect();
        assert_eq!(exceeded.as_slice(), &[Channel::Pm2_5]);
    }

    #[test]
    fn threshold_is_strict() {
        let baseline = steady();
        let mut current = steady();
        current.co2 = Some(650.0);
        assert!(!should_report(&current, &baseline, &ReportThresholds::default()));

        current.co2 = Some(651.0);
        assert!(should_report(&current, &baseline, &ReportThresholds::default()));
    }

    #[test]
    fn every_thresholded_channel_can_trigger() {
        let thresholds = ReportThresholds::default();
        for channel in Channel::ALL {
            let mut current = steady();
            let base = current.get(channel).unwrap();
            current.set(channel, Some(base + 100.0));

            let triggered = should_report(&current, &steady(), &thresholds);
            assert_eq!(triggered, channel != Channel::Pm4_0, "{channel:?}");
        }
    }

    #[test]
    fn incomplete_snapshot_is_rejected() {
        let mut policy = ReportingPolicy::new(steady(), ReportThresholds::default());

        let mut current = steady();
        current.pm2_5 = Some(500.0);
        current.humidity = None;
        assert_eq!(policy.evaluate(&current), Decision::Rejected(Channel::Humidity));

        current.humidity = Some(f32::NAN);
        assert_eq!(policy.evaluate(&current), Decision::Rejected(Channel::Humidity));

        current.humidity = Some(40.0);
        current.voc_index = Some(f32::INFINITY);
        assert_eq!(policy.evaluate(&current), Decision::Rejected(Channel::VocIndex));

        assert_eq!(policy.baseline(), &steady());
        assert_eq!(policy.state(), PolicyState::Idle);
    }

    #[test]
    fn absent_pm4_does_not_block_report() {
        let mut policy = ReportingPolicy::new(steady(), ReportThresholds::default());

        let mut current = steady();
        current.pm4_0 = None;
        current.pm2_5 = Some(500.0);
        assert!(matches!(policy.evaluate(&current), Decision::Report(_)));
        assert!(should_report(&current, &steady(), &ReportThresholds::default()));

        current.pm2_5 = steady().pm2_5;
        current.pm4_0 = Some(f32::NAN);
        assert_eq!(policy.evaluate(&current), Decision::WithinThresholds);
    }

    #[test]
    fn baseline_advances_only_on_publish() {
        let mut policy = ReportingPolicy::new(steady(), ReportThresholds::default());
        let mut current = steady();
        current.temperature = Some(22.0);

        assert!(policy.evaluate(&current).should_report());
        assert_eq!(policy.baseline(), &steady());

        policy.on_published(current);
        assert_eq!(policy.evaluate(&current), Decision::WithinThresholds);
    }

    #[test]
    fn deltas_are_absolute() {
        let mut current = steady();
        current.temperature = Some(20.0);
        let deltas = ChannelDeltas::between(&current, &steady(), &ReportThresholds::default());
        assert_eq!(deltas.get(Channel::Temperature), Some(1.0));
        assert_eq!(deltas.get(Channel::Pm4_0), None);
    }

    #[test]
    fn validate_rejects_bad_thresholds() {
        assert!(ReportThresholds::default().validate().is_ok());

        let mut t = ReportThresholds::default();
        t.co2 = -1.0;
        assert_eq!(t.validate(), Err(ConfigError::InvalidThreshold { channel: "co2" }));

        let mut t = ReportThresholds::default();
        t.humidity = f32::NAN;
        assert!(t.validate().is_err());
    }
}
