//! JSON-lines attribute publisher
//!
//! Writes one JSON object per update to any `io::Write`:
//!
//! ```text
//! {"type":"channel","channel":"pm2_5","value":10.0,"unit":"μg/m³"}
//! {"type":"level","level":"good","ordinal":0}
//! ```
//!
//! Stdout, a file or a pipe into another process all work the same way.

use std::io::{self, Write};

use airguard_core::{AirQualityLevel, Channel, Publisher};
use serde::Serialize;
use thiserror::Error;

/// Publisher errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// Writer failed
    #[error("Write failed: {0}")]
    Io(#[from] io::Error),

    /// Update could not be encoded
    #[error("Encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One published update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeUpdate {
    /// Channel value
    Channel {
        /// Channel
        channel: Channel,
        /// Calibrated value
        value: f32,
        /// Unit of `value`
        unit: &'static str,
    },
    /// Overall level
    Level {
        /// Level
        level: AirQualityLevel,
        /// Wire value of the level
        ordinal: u8,
    },
}

/// Publisher writing JSON lines
#[derive(Debug)]
pub struct JsonLinesPublisher<W: Write> {
    writer: W,
    written: u64,
    failed: u64,
}

impl<W: Write> JsonLinesPublisher<W> {
    /// Publisher over `writer`
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, failed: 0 }
    }

    /// Write one update and flush
    pub fn write_update(&mut self, update: &AttributeUpdate) -> Result<(), PublishError> {
        serde_json::to_writer(&mut self.writer, update)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn publish(&mut self, update: AttributeUpdate) {
        match self.write_update(&update) {
            Ok(()) => self.written += 1,
            Err(err) => {
                self.failed += 1;
                log::warn!("Dropping update {update:?}: {err}");
            }
        }
    }

    /// Updates written successfully
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Updates dropped because of write errors
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Take back the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Publisher for JsonLinesPublisher<W> {
    fn update_channel(&mut self, channel: Channel, value: f32) {
        self.publish(AttributeUpdate::Channel {
            channel,
            value,
            unit: channel.unit(),
        });
    }

    fn update_level(&mut self, level: AirQualityLevel) {
        self.publish(AttributeUpdate::Level {
            level,
            ordinal: level.ordinal(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_one_line_per_update() {
        let mut publisher = JsonLinesPublisher::new(Vec::new());
        publisher.update_channel(Channel::Co2, 612.0);
        publisher.update_level(AirQualityLevel::Fair);

        let text = String::from_utf8(publisher.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                r#"{"type":"channel","channel":"co2","value":612.0,"unit":"ppm"}"#,
                r#"{"type":"level","level":"fair","ordinal":1}"#,
            ]
        );
    }

    #[test]
    fn write_errors_are_counted_not_raised() {
        let mut publisher = JsonLinesPublisher::new(Broken);
        publisher.update_level(AirQualityLevel::Good);
        assert_eq!(publisher.failed(), 1);
        assert_eq!(publisher.written(), 0);
    }
}
