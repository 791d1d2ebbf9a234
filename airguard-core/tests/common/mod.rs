//! Test doubles for the pipeline ports
//!
//! - [`ScriptedTransport`]: replays a fixed script of ready / not-ready /
//!   bus-error steps
//! - [`MemoryStore`]: namespaced blobs in a `HashMap`, with failure switches
//! - [`RecordingPublisher`]: keeps every update in order
//! - [`InstantDelay`]: adds up requested delays without sleeping

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use airguard_core::{
    AirQualityLevel, BaselineStore, Channel, Delay, Publisher, RawReading, StorageError,
    Transport, TransportError,
};

/// One scripted transport response
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Data ready
    Ready(RawReading),
    /// Data-ready flag not set
    NotReady,
    /// Bus failure
    Fail(&'static str),
}

/// Transport replaying a script; an exhausted script is never ready
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    steps: VecDeque<Step>,
    pub reads: u32,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self { steps: steps.into_iter().collect(), reads: 0 }
    }

    /// Script that is ready with the same reading `n` times
    pub fn repeating(raw: RawReading, n: usize) -> Self {
        Self::new(std::iter::repeat(Step::Ready(raw)).take(n))
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push_back(step);
    }
}

impl Transport for ScriptedTransport {
    fn read_raw(&mut self) -> nb::Result<RawReading, TransportError> {
        self.reads += 1;
        match self.steps.pop_front() {
            Some(Step::Ready(raw)) => Ok(raw),
            Some(Step::Fail(reason)) => Err(nb::Error::Other(TransportError::Bus { reason })),
            Some(Step::NotReady) | None => Err(nb::Error::WouldBlock),
        }
    }
}

/// In-memory key/value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<(String, String), Vec<u8>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: u32,
}

impl MemoryStore {
    pub fn with_blob(namespace: &str, key: &str, blob: &[u8]) -> Self {
        let mut store = Self::default();
        store
            .blobs
            .insert((namespace.to_string(), key.to_string()), blob.to_vec());
        store
    }

    pub fn blob(&self, namespace: &str, key: &str) -> Option<&[u8]> {
        self.blobs
            .get(&(namespace.to_string(), key.to_string()))
            .map(Vec::as_slice)
    }
}

impl BaselineStore for MemoryStore {
    fn get(
        &mut self,
        namespace: &str,
        key: &str,
        buf: &mut [u8],
    ) -> Result<Option<usize>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::ReadFailed { reason: "injected" });
        }
        Ok(self.blob(namespace, key).map(|blob| {
            let n = blob.len().min(buf.len());
            buf[..n].copy_from_slice(&blob[..n]);
            blob.len()
        }))
    }

    fn set(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed { reason: "injected" });
        }
        self.writes += 1;
        self.blobs
            .insert((namespace.to_string(), key.to_string()), value.to_vec());
        Ok(())
    }
}

/// Recorded publisher update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    Channel(Channel, f32),
    Level(AirQualityLevel),
}

/// Publisher that records every update
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    pub updates: Vec<Update>,
}

impl RecordingPublisher {
    pub fn levels(&self) -> Vec<AirQualityLevel> {
        self.updates
            .iter()
            .filter_map(|u| match u {
                Update::Level(level) => Some(*level),
                Update::Channel(..) => None,
            })
            .collect()
    }

    pub fn last_value(&self, channel: Channel) -> Option<f32> {
        self.updates.iter().rev().find_map(|u| match u {
            Update::Channel(c, v) if *c == channel => Some(*v),
            _ => None,
        })
    }
}

impl Publisher for RecordingPublisher {
    fn update_channel(&mut self, channel: Channel, value: f32) {
        self.updates.push(Update::Channel(channel, value));
    }

    fn update_level(&mut self, level: AirQualityLevel) {
        self.updates.push(Update::Level(level));
    }
}

/// Delay that only counts
#[derive(Debug, Default)]
pub struct InstantDelay {
    pub total_ms: u64,
}

impl Delay for InstantDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

/// Clean indoor air: 22 °C, 40 %RH, PM2.5 10 µg/m³, CO₂ 550 ppm
pub fn indoor_reading() -> RawReading {
    RawReading {
        temperature: 4400,
        humidity: 4000,
        pm1_0: 50,
        pm2_5: 100,
        pm4_0: 120,
        pm10_0: 150,
        voc_index: 1000,
        nox_index: 10,
        co2: 550,
    }
}
