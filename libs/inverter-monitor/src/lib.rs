//! Inverter Monitor
//!
//! Glue between configuration, the register codec and the health tracker:
//!
//! - [`MonitorConfig`] loads logging, health and sensor definitions from a
//!   file plus `INVERTER_MONITOR_*` environment overrides
//! - [`SensorCatalog`] holds the decoded sensor configs and plans batched
//!   register reads
//! - [`PollCycle`] decodes one read and records every outcome
//!
//! The Modbus transport that fills the register blocks lives elsewhere.

pub mod catalog;
pub mod config;
pub mod error;
pub mod poll;

pub use catalog::{ReadRange, RejectedSensor, SensorCatalog, SensorEntry};
pub use config::{MonitorConfig, DEFAULT_BATCH_SIZE, ENV_PREFIX};
pub use error::{MonitorError, Result};
pub use poll::{CycleReport, PollCycle, SensorFailure};
