//! Shared doubles for connector integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use airguard_core::{
    AirQualityLevel, Channel, Delay, Publisher, RawReading, Transport, TransportError,
};

/// Clean indoor air
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

/// Read counters shared between a transport and the test
#[derive(Debug, Default)]
pub struct ReadCounters {
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub reads: AtomicUsize,
}

/// Transport that blocks for a while on every read
pub struct SlowTransport {
    pub counters: Arc<ReadCounters>,
    pub busy: Duration,
}

impl Transport for SlowTransport {
    fn read_raw(&mut self) -> nb::Result<RawReading, TransportError> {
        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.counters.reads.fetch_add(1, Ordering::SeqCst);

        std::thread::sleep(self.busy);

        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(indoor_reading())
    }
}

/// Publisher sharing its log with the test
#[derive(Clone, Default)]
pub struct SharedPublisher {
    pub levels: Arc<Mutex<Vec<AirQualityLevel>>>,
}

impl Publisher for SharedPublisher {
    fn update_channel(&mut self, _channel: Channel, _value: f32) {}

    fn update_level(&mut self, level: AirQualityLevel) {
        if let Ok(mut levels) = self.levels.lock() {
            levels.push(level);
        }
    }
}

/// Delay that returns at once
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}
