//! Host-side Adapters for the AirGuard Pipeline
//!
//! ## Overview
//!
//! `airguard-core` only knows its ports. This crate provides `std`
//! implementations of them for gateways, desktop tools and tests:
//!
//! | Port            | Adapter                                   |
//! |-----------------|-------------------------------------------|
//! | `BaselineStore` | [`FileBaselineStore`], [`MemoryStore`]    |
//! | `Publisher`     | [`JsonLinesPublisher`]                    |
//! | `Transport`     | [`ReplayTransport`]                       |
//!
//! plus [`load_config`] for JSON configuration files and [`SensorTask`],
//! the tokio-driven periodic scheduler.
//!
//! ## Example Usage
//!
//! ```no_run
//! use airguard_connectors::{FileBaselineStore, JsonLinesPublisher, ReplayTransport, SensorTask};
//! use airguard_core::{Pipeline, PipelineConfig, StdDelay};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(
//!     ReplayTransport::open("recording.jsonl")?,
//!     FileBaselineStore::new("/var/lib/airguard"),
//!     JsonLinesPublisher::new(std::io::stdout()),
//!     StdDelay,
//!     PipelineConfig::default(),
//! )?;
//!
//! let task = SensorTask::start(pipeline)?;
//! // ...
//! let pipeline = task.stop().await?;
//! println!("{:?}", pipeline.stats());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod publisher;
pub mod replay;
pub mod scheduler;
pub mod store;

// Re-export common types
pub use config::{load_config, parse_config, ConfigLoadError};
pub use publisher::{AttributeUpdate, JsonLinesPublisher, PublishError};
pub use replay::ReplayTransport;
pub use scheduler::{SchedulerError, SensorTask, TaskStatus};
pub use store::{FileBaselineStore, MemoryStore, StoreError};
