//! Poll cycle
//!
//! Decodes every catalogued sensor from the registers of one read and feeds
//! the outcomes to the health tracker. A sensor that fails to decode is
//! logged and recorded; the rest of the cycle carries on. Sensors whose
//! definition was rejected are recorded as failures on every cycle.

use std::collections::BTreeMap;

use register_codec::{DecodeError, DecodedValue, RegisterParser, RegisterSource};
use sensor_health::{SensorHealth, SharedSensorHealth};
use serde::Serialize;
use tracing::{debug, info_span, warn};

use crate::catalog::SensorCatalog;

/// One sensor that failed to decode in a cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFailure {
    pub sensor_id: String,
    pub error: DecodeError,
}

/// Result of one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    /// Decoded values keyed by sensor id
    pub values: BTreeMap<String, DecodedValue>,
    #[serde(skip)]
    pub failures: Vec<SensorFailure>,
    /// Ids of sensors skipped for an invalid definition
    #[serde(skip)]
    pub skipped: Vec<String>,
}

impl CycleReport {
    pub fn attempted(&self) -> usize {
        self.values.len() + self.failures.len() + self.skipped.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    pub fn value(&self, sensor_id: &str) -> Option<&DecodedValue> {
        self.values.get(sensor_id)
    }

    fn push(&mut self, sensor_id: &str, outcome: Result<DecodedValue, DecodeError>) {
        match outcome {
            Ok(value) => {
                self.values.insert(sensor_id.to_string(), value);
            },
            Err(error) => {
                warn!(sensor = %sensor_id, error = %error, "Sensor decode failed");
                self.failures.push(SensorFailure {
                    sensor_id: sensor_id.to_string(),
                    error,
                });
            },
        }
    }
}

/// Where a poll cycle records its outcomes
trait HealthSink {
    fn record_outcome(&mut self, sensor_id: &str, outcome: &Result<DecodedValue, DecodeError>);
    fn record_failure(&mut self, sensor_id: &str, reason: String);
}

impl HealthSink for SensorHealth {
    fn record_outcome(&mut self, sensor_id: &str, outcome: &Result<DecodedValue, DecodeError>) {
        SensorHealth::record_outcome(self, sensor_id, outcome);
    }

    fn record_failure(&mut self, sensor_id: &str, reason: String) {
        SensorHealth::record_failure(self, sensor_id, reason);
    }
}

impl HealthSink for SharedSensorHealth {
    fn record_outcome(&mut self, sensor_id: &str, outcome: &Result<DecodedValue, DecodeError>) {
        SharedSensorHealth::record_outcome(self, sensor_id, outcome);
    }

    fn record_failure(&mut self, sensor_id: &str, reason: String) {
        SharedSensorHealth::record_failure(self, sensor_id, reason);
    }
}

/// Serial decoder over a sensor catalog
#[derive(Debug, Clone)]
pub struct PollCycle {
    catalog: SensorCatalog,
    parser: RegisterParser,
}

impl PollCycle {
    pub fn new(catalog: SensorCatalog) -> Self {
        Self {
            catalog,
            parser: RegisterParser::new(),
        }
    }

    pub fn catalog(&self) -> &SensorCatalog {
        &self.catalog
    }

    /// Decode every sensor from `source` and record each outcome
    pub fn run<S>(&self, source: &S, health: &mut SensorHealth) -> CycleReport
    where
        S: RegisterSource + ?Sized,
    {
        self.decode_all(source, health)
    }

    /// Same as [`PollCycle::run`], recording into a shared tracker
    ///
    /// The tracker lock is held per record, never across a decode.
    pub fn run_shared<S>(&self, source: &S, health: &SharedSensorHealth) -> CycleReport
    where
        S: RegisterSource + ?Sized,
    {
        self.decode_all(source, &mut health.clone())
    }

    fn decode_all<S, H>(&self, source: &S, health: &mut H) -> CycleReport
    where
        S: RegisterSource + ?Sized,
        H: HealthSink,
    {
        let _span = info_span!("poll_cycle", sensors = self.catalog.len()).entered();
        let mut report = CycleReport::default();

        for entry in &self.catalog {
            let outcome = self.parser.decode_from(source, &entry.config);
            health.record_outcome(&entry.id, &outcome);
            report.push(&entry.id, outcome);
        }

        for rejected in self.catalog.rejected() {
            health.record_failure(&rejected.id, rejected.error.to_string());
            report.skipped.push(rejected.id.clone());
        }

        debug!(
            decoded = report.values.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "Poll cycle complete"
        );
        report
    }
}
