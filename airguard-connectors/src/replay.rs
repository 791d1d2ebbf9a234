//! Replay transport
//!
//! Feeds recorded raw readings back through a pipeline, one JSON object per
//! line in [`RawReading`] field names:
//!
//! ```text
//! {"temperature":4500,"humidity":4000,"pm1_0":30,"pm2_5":52,"pm4_0":60,"pm10_0":75,"voc_index":1000,"nox_index":10,"co2":612}
//! ```
//!
//! Blank lines are skipped. A line that does not parse is reported as a bus
//! error for that read, so a corrupted recording behaves like a flaky bus.
//! Once the recording is exhausted the transport is never ready again,
//! unless it was built with [`ReplayTransport::looping`].

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use airguard_core::{RawReading, Transport, TransportError};

#[derive(Debug, Clone)]
enum Frame {
    Reading(RawReading),
    Corrupt,
}

/// Transport replaying a recording
#[derive(Debug, Clone, Default)]
pub struct ReplayTransport {
    frames: VecDeque<Frame>,
    looping: bool,
}

impl ReplayTransport {
    /// Replay readings in order
    pub fn from_readings(readings: impl IntoIterator<Item = RawReading>) -> Self {
        Self {
            frames: readings.into_iter().map(Frame::Reading).collect(),
            looping: false,
        }
    }

    /// Parse a JSON-lines recording
    pub fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut frames = VecDeque::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RawReading>(&line) {
                Ok(raw) => frames.push_back(Frame::Reading(raw)),
                Err(err) => {
                    log::warn!("Replay line {} is corrupt: {err}", idx + 1);
                    frames.push_back(Frame::Corrupt);
                }
            }
        }
        Ok(Self { frames, looping: false })
    }

    /// Open a JSON-lines recording file
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Restart from the beginning when exhausted
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Frames not yet replayed
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Transport for ReplayTransport {
    fn read_raw(&mut self) -> nb::Result<RawReading, TransportError> {
        let frame = self.frames.pop_front().ok_or(nb::Error::WouldBlock)?;
        if self.looping {
            self.frames.push_back(frame.clone());
        }

        match frame {
            Frame::Reading(raw) => Ok(raw),
            Frame::Corrupt => Err(nb::Error::Other(TransportError::Bus {
                reason: "corrupt replay frame",
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{"temperature":4500,"humidity":4000,"pm1_0":30,"pm2_5":52,"pm4_0":60,"pm10_0":75,"voc_index":1000,"nox_index":10,"co2":612}"#;

    #[test]
    fn replays_lines_in_order() {
        let text = format!("{LINE}\n\nnot json\n");
        let mut transport = ReplayTransport::from_reader(text.as_bytes()).unwrap();
        assert_eq!(transport.remaining(), 2);

        let raw = transport.read_raw().unwrap();
        assert_eq!(raw.co2, 612);
        assert_eq!(raw.temperature, 4500);

        assert!(matches!(
            transport.read_raw(),
            Err(nb::Error::Other(TransportError::Bus { .. }))
        ));
        assert!(matches!(transport.read_raw(), Err(nb::Error::WouldBlock)));
    }

    #[test]
    fn looping_restarts() {
        let mut transport = ReplayTransport::from_readings([RawReading::INVALID]).looping();
        for _ in 0..3 {
            assert_eq!(transport.read_raw().unwrap(), RawReading::INVALID);
        }
    }
}
