//! Periodic Pipeline Scheduler
//!
//! ## Overview
//!
//! [`SensorTask`] drives one [`Pipeline`] on a tokio runtime. It owns the
//! pipeline for as long as it runs and hands it back on [`SensorTask::stop`].
//!
//! ## Tick Handling
//!
//! ```text
//! ticker ──▶ spawn_blocking(move pipeline, tick, move it back) ──▶ next tick
//! ```
//!
//! The pipeline is moved into the blocking worker and returned with the
//! outcome, so a tick runs only when the previous one has finished. Ticks
//! that fall due while one is running are skipped, not queued
//! ([`MissedTickBehavior::Skip`]).
//!
//! ## Interval Changes
//!
//! [`SensorTask::set_interval`] cancels the current timer and starts a new
//! one; the first tick on the new timer is one full period later.

use std::time::Duration;

use airguard_core::{BaselineStore, Delay, Pipeline, Publisher, TickOutcome, Transport};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Called outside a tokio runtime
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// Interval of zero
    #[error("Tick interval must be non-zero")]
    ZeroInterval,

    /// Task is no longer running
    #[error("Sensor task has stopped")]
    Stopped,

    /// A tick panicked or the task was cancelled; the pipeline is lost
    #[error("Sensor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Latest tick result published by the task
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaskStatus {
    /// Ticks completed
    pub ticks: u64,
    /// Outcome of the last tick
    pub last: Option<TickOutcome>,
}

/// Running periodic task
#[derive(Debug)]
pub struct SensorTask<T, S, P, D> {
    interval_tx: watch::Sender<Duration>,
    status_rx: watch::Receiver<TaskStatus>,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<Result<Pipeline<T, S, P, D>, SchedulerError>>,
}

impl<T, S, P, D> SensorTask<T, S, P, D>
where
    T: Transport + Send + 'static,
    S: BaselineStore + Send + 'static,
    P: Publisher + Send + 'static,
    D: Delay + Send + 'static,
{
    /// Arm the timer with the pipeline's configured tick interval
    pub fn start(pipeline: Pipeline<T, S, P, D>) -> Result<Self, SchedulerError> {
        let period = Duration::from_millis(pipeline.config().tick_interval_ms);
        Self::start_with_interval(pipeline, period)
    }

    /// Arm the timer with an explicit interval
    pub fn start_with_interval(
        pipeline: Pipeline<T, S, P, D>,
        period: Duration,
    ) -> Result<Self, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        let runtime = Handle::try_current()?;

        let (interval_tx, interval_rx) = watch::channel(period);
        let (status_tx, status_rx) = watch::channel(TaskStatus::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = runtime.spawn(run(pipeline, interval_rx, status_tx, shutdown_rx));
        log::info!("Sensor task started, interval {period:?}");

        Ok(Self {
            interval_tx,
            status_rx,
            shutdown_tx,
            handle,
        })
    }

    /// Change the tick interval; restarts the timer
    pub fn set_interval(&self, period: Duration) -> Result<(), SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        self.interval_tx
            .send(period)
            .map_err(|_| SchedulerError::Stopped)
    }

    /// Current tick interval
    pub fn interval(&self) -> Duration {
        *self.interval_tx.borrow()
    }

    /// Watch tick results
    pub fn subscribe(&self) -> watch::Receiver<TaskStatus> {
        self.status_rx.clone()
    }

    /// Latest status
    pub fn status(&self) -> TaskStatus {
        *self.status_rx.borrow()
    }

    /// Disarm the timer, wait for a running tick and return the pipeline
    pub async fn stop(self) -> Result<Pipeline<T, S, P, D>, SchedulerError> {
        // Err only if the task already ended; the join below reports why
        let _ = self.shutdown_tx.send(());
        let pipeline = self.handle.await??;
        log::info!("Sensor task stopped after {} ticks", pipeline.stats().ticks);
        Ok(pipeline)
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn run<T, S, P, D>(
    mut pipeline: Pipeline<T, S, P, D>,
    mut interval_rx: watch::Receiver<Duration>,
    status_tx: watch::Sender<TaskStatus>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<Pipeline<T, S, P, D>, SchedulerError>
where
    T: Transport + Send + 'static,
    S: BaselineStore + Send + 'static,
    P: Publisher + Send + 'static,
    D: Delay + Send + 'static,
{
    let mut timer = ticker(*interval_rx.borrow_and_update());

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown_rx => break,

            changed = interval_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let period = *interval_rx.borrow_and_update();
                log::info!("Tick interval changed to {period:?}");
                timer = ticker(period);
            }

            _ = timer.tick() => {
                let (returned, outcome) = tokio::task::spawn_blocking(move || {
                    let outcome = pipeline.tick();
                    (pipeline, outcome)
                })
                .await?;
                pipeline = returned;

                log::debug!("Tick finished: {outcome:?}");
                status_tx.send_modify(|status| {
                    status.ticks += 1;
                    status.last = Some(outcome);
                });
            }
        }
    }

    Ok(pipeline)
}
