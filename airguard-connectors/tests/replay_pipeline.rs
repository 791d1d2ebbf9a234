//! A recorded session replayed end to end

use std::io::Write;

use airguard_connectors::{load_config, FileBaselineStore, JsonLinesPublisher, ReplayTransport};
use airguard_core::{AirQualityLevel, Pipeline, TickOutcome, TransportError};

const RECORDING: &str = r#"{"temperature":4400,"humidity":4000,"pm1_0":50,"pm2_5":100,"pm4_0":120,"pm10_0":150,"voc_index":1000,"nox_index":10,"co2":550}
{"temperature":4400,"humidity":4000,"pm1_0":50,"pm2_5":100,"pm4_0":120,"pm10_0":150,"voc_index":1000,"nox_index":10,"co2":550}
{"temperature":4400,"humidity":4000,"pm1_0":50,"pm2_5":65535,"pm4_0":120,"pm10_0":150,"voc_index":1000,"nox_index":10,"co2":550}
{"temperature":4400,"humidity":4000,"pm1_0":50,"pm2_5":100,"pm4_0":120,"pm10_0":150,"voc_index":1000,"nox_index":10,"co2":1500}
"#;

struct NoDelay;

impl airguard_core::Delay for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

#[test]
fn replayed_session_publishes_changes_only() {
    let dir = tempfile::tempdir().unwrap();

    let config_path = dir.path().join("airguard.json");
    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        r#"{{"filter_window": 1, "read_timeout_ms": 100, "poll_interval_ms": 10}}"#
    )
    .unwrap();
    let config = load_config(&config_path).unwrap();

    let transport = ReplayTransport::from_reader(RECORDING.as_bytes()).unwrap();
    let store = FileBaselineStore::new(dir.path().join("state"));
    let publisher = JsonLinesPublisher::new(Vec::new());
    let mut pipeline = Pipeline::new(transport, store, publisher, NoDelay, config).unwrap();

    let outcomes: Vec<TickOutcome> = (0..5).map(|_| pipeline.tick()).collect();
    assert_eq!(
        outcomes,
        [
            TickOutcome::Published { level: AirQualityLevel::Good, persisted: true },
            TickOutcome::WithinThresholds { level: AirQualityLevel::Good },
            TickOutcome::Rejected(airguard_core::Channel::Pm2_5),
            TickOutcome::Published { level: AirQualityLevel::ExtremelyPoor, persisted: true },
            TickOutcome::ReadFailed(TransportError::Timeout { waited_ms: 100 }),
        ]
    );

    let (_, _, publisher, _) = pipeline.into_parts();
    assert_eq!(publisher.written(), 20);
    let text = String::from_utf8(publisher.into_inner()).unwrap();
    let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last["level"], "extremely_poor");
    assert_eq!(last["ordinal"], 5);

    assert!(dir.path().join("state/airguard/last_pub.bin").exists());
}
