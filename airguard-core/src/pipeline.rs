//! Measurement-to-Decision Pipeline
//!
//! ## Overview
//!
//! [`Pipeline`] owns everything one sensor needs between two ticks: the
//! three collaborator ports, the PM filters, the classifier and the reporting
//! policy with its baseline. There is no global state; one value is built at
//! startup and handed to whatever drives the ticks.
//!
//! ## One Tick
//!
//! ```text
//! Transport ──read──▶ RawReading ──convert──▶ Measurement
//!                                                 │
//!                                    PM filters ──┤ smoothed
//!                                                 ▼
//!                       ┌──── classify ───── level
//!                       │
//!                       └──── policy.evaluate ─┬─ Rejected ─────────▶ stop
//!                                              ├─ WithinThresholds ─▶ stop
//!                                              └─ Report ─▶ Publisher
//!                                                           baseline := smoothed
//!                                                           BaselineStore.set
//! ```
//!
//! Nothing in a tick is fatal. A failed read abandons the cycle without
//! touching any state. A failed persist is logged; the publish has already
//! happened and the in-memory baseline still advances.
//!
//! `tick` takes `&mut self`, so two ticks can never overlap on one pipeline.

use crate::baseline;
use crate::classifier::{AirQualityClassifier, AirQualityLevel};
use crate::config::PipelineConfig;
use crate::convert::convert;
use crate::errors::{ConfigResult, TransportError};
use crate::filter::ParticulateFilters;
use crate::measurement::{Channel, Measurement};
use crate::policy::{Decision, ReportingPolicy};
use crate::traits::{BaselineStore, Delay, Publisher, Transport};
use crate::transport::read_measurement;

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No reading this cycle
    ReadFailed(TransportError),
    /// Smoothed snapshot incomplete; first offending channel
    Rejected(Channel),
    /// Nothing changed enough to publish
    WithinThresholds {
        /// Level of the smoothed snapshot
        level: AirQualityLevel,
    },
    /// Snapshot and level were published
    Published {
        /// Published level
        level: AirQualityLevel,
        /// Whether the new baseline reached the store
        persisted: bool,
    },
}

/// Running counters, for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Ticks run
    pub ticks: u32,
    /// Reads that failed or timed out
    pub read_failures: u32,
    /// Cycles rejected for an incomplete snapshot
    pub rejected: u32,
    /// Cycles within thresholds
    pub within_thresholds: u32,
    /// Cycles that published
    pub published: u32,
    /// Baseline writes that failed
    pub persist_failures: u32,
}

impl PipelineStats {
    fn record(&mut self, outcome: &TickOutcome) {
        self.ticks = self.ticks.wrapping_add(1);
        let counter = match outcome {
            TickOutcome::ReadFailed(_) => &mut self.read_failures,
            TickOutcome::Rejected(_) => &mut self.rejected,
            TickOutcome::WithinThresholds { .. } => &mut self.within_thresholds,
            TickOutcome::Published { persisted, .. } => {
                if !persisted {
                    self.persist_failures = self.persist_failures.wrapping_add(1);
                }
                &mut self.published
            }
        };
        *counter = counter.wrapping_add(1);
    }
}

/// Sensor pipeline over a transport `T`, store `S`, publisher `P` and delay `D`
pub struct Pipeline<T, S, P, D> {
    transport: T,
    store: S,
    publisher: P,
    delay: D,
    config: PipelineConfig,
    filters: ParticulateFilters,
    classifier: AirQualityClassifier,
    policy: ReportingPolicy,
    stats: PipelineStats,
}

impl<T, S, P, D> Pipeline<T, S, P, D>
where
    T: Transport,
    S: BaselineStore,
    P: Publisher,
    D: Delay,
{
    /// Build a pipeline and restore the baseline from `store`
    pub fn new(
        transport: T,
        mut store: S,
        publisher: P,
        delay: D,
        config: PipelineConfig,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let baseline = baseline::load(&mut store);
        log_info!(
            "Restored baseline: pm2_5={:?} co2={:?} temperature={:?}",
            baseline.pm2_5,
            baseline.co2,
            baseline.temperature
        );

        Ok(Self {
            transport,
            store,
            publisher,
            delay,
            filters: ParticulateFilters::new(config.filter_window)?,
            classifier: AirQualityClassifier::new(config.unknown_policy),
            policy: ReportingPolicy::new(baseline, config.thresholds),
            config,
            stats: PipelineStats::default(),
        })
    }

    /// Run one read → decide → publish cycle
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.run_cycle();
        self.stats.record(&outcome);
        outcome
    }

    fn run_cycle(&mut self) -> TickOutcome {
        let raw = match read_measurement(
            &mut self.transport,
            &mut self.delay,
            self.config.read_timeout_ms,
            self.config.poll_interval_ms,
        ) {
            Ok(raw) => raw,
            Err(err) => {
                log_warn!("Sensor read failed: {}", err);
                return TickOutcome::ReadFailed(err);
            }
        };

        let measurement = convert(&raw);
        for _channel in measurement.out_of_range_channels() {
            log_warn!(
                "{} = {:?} outside module span {:?}",
                _channel.name(),
                measurement.get(_channel),
                _channel.span()
            );
        }

        let smoothed = self.filters.smooth(&measurement);
        let level = self.classifier.classify(&smoothed);

        match self.policy.evaluate(&smoothed) {
            Decision::Rejected(channel) => {
                log_debug!("Skipping cycle: {} unavailable", channel.name());
                TickOutcome::Rejected(channel)
            }
            Decision::WithinThresholds => {
                log_debug!("No significant change (level {})", level);
                TickOutcome::WithinThresholds { level }
            }
            Decision::Report(deltas) => {
                for _delta in deltas.exceeded() {
                    log_info!(
                        "{} changed by {} (threshold {})",
                        _delta.channel.name(),
                        _delta.delta,
                        _delta.threshold
                    );
                }
                self.publish(&smoothed, level);
                self.policy.on_published(smoothed);

                let persisted = match baseline::save(&mut self.store, &smoothed) {
                    Ok(()) => true,
                    Err(_err) => {
                        log_warn!("Baseline persist failed: {}", _err);
                        false
                    }
                };
                TickOutcome::Published { level, persisted }
            }
        }
    }

    fn publish(&mut self, snapshot: &Measurement, level: AirQualityLevel) {
        for (channel, value) in snapshot.channels() {
            if let Some(value) = value.filter(|v| v.is_finite()) {
                self.publisher.update_channel(channel, value);
            }
        }
        self.publisher.update_level(level);
        log_info!("Published air quality level {} ({})", level, level.ordinal());
    }

    /// Apply a new configuration
    ///
    /// A changed filter window restarts the filters; thresholds and the
    /// `Unknown` policy apply from the next tick. The baseline is kept.
    pub fn set_config(&mut self, config: PipelineConfig) -> ConfigResult<()> {
        config.validate()?;

        if config.filter_window != self.config.filter_window {
            self.filters = ParticulateFilters::new(config.filter_window)?;
        }
        self.classifier = AirQualityClassifier::new(config.unknown_policy);
        self.policy.set_thresholds(config.thresholds);
        self.config = config;
        Ok(())
    }
}

impl<T, S, P, D> Pipeline<T, S, P, D> {
    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Last published snapshot
    pub fn baseline(&self) -> &Measurement {
        self.policy.baseline()
    }

    /// Counters since construction
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Publisher port
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Transport port
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Store port
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Take the ports back
    pub fn into_parts(self) -> (T, S, P, D) {
        (self.transport, self.store, self.publisher, self.delay)
    }
}

impl<T, S, P, D> core::fmt::Debug for Pipeline<T, S, P, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("baseline", self.policy.baseline())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
