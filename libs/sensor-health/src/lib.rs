//! Sensor Health
//!
//! Tracks how reliably each inverter sensor decodes over time and classifies
//! sensors as healthy, degraded or unhealthy by success rate.
//!
//! ```rust
//! use register_codec::DecodedValue;
//! use sensor_health::{HealthStatus, SensorHealth};
//!
//! let mut health = SensorHealth::new();
//! for _ in 0..16 {
//!     health.record("battery_soc", Some(DecodedValue::Number(87.0)), true);
//! }
//! for _ in 0..4 {
//!     health.record("battery_soc", None, false);
//! }
//!
//! let detail = health.sensor("battery_soc").unwrap();
//! assert_eq!(detail.status, HealthStatus::Degraded);
//! ```

pub mod report;
pub mod shared;
pub mod status;
pub mod tracker;

pub use report::{HealthSummary, SensorHealthDetail};
pub use shared::SharedSensorHealth;
pub use status::{
    HealthSettings, HealthStatus, HealthThresholds, DEFAULT_DEGRADED_THRESHOLD,
    DEFAULT_FAILURE_HISTORY, DEFAULT_HEALTHY_THRESHOLD,
};
pub use tracker::{FailureEntry, Observation, SensorHealth};
