//! Sensor health tracker
//!
//! In-memory accumulator of decode outcomes per sensor. Records are created on
//! the first observation of a sensor id and live as long as the tracker.
//! Recording never fails, so it is safe to call from a decode-failure path.

use std::collections::VecDeque;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use register_codec::{DecodeError, DecodedValue};
use serde::Serialize;
use tracing::{debug, trace};

use crate::report::{self, HealthSummary, SensorHealthDetail};
use crate::status::HealthSettings;

/// One failed observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEntry {
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Outcome of one decode attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Success(DecodedValue),
    Failure(Option<String>),
}

impl Observation {
    pub fn from_outcome(outcome: &Result<DecodedValue, DecodeError>) -> Self {
        match outcome {
            Ok(value) => Self::Success(value.clone()),
            Err(err) => Self::Failure(Some(err.to_string())),
        }
    }
}

/// Cumulative statistics for one sensor
#[derive(Debug, Clone, Default)]
pub(crate) struct SensorRecord {
    pub(crate) attempts: u64,
    pub(crate) successes: u64,
    pub(crate) failures: u64,
    pub(crate) last_value: Option<DecodedValue>,
    pub(crate) value_type: Option<&'static str>,
    pub(crate) last_success: Option<DateTime<Utc>>,
    pub(crate) last_failure: Option<DateTime<Utc>>,
    pub(crate) recent_failures: VecDeque<FailureEntry>,
}

impl SensorRecord {
    /// `None` until the sensor has been attempted at least once
    pub(crate) fn success_rate(&self) -> Option<f64> {
        (self.attempts > 0).then(|| self.successes as f64 / self.attempts as f64)
    }
}

/// Per-sensor reliability tracker
#[derive(Debug, Clone, Default)]
pub struct SensorHealth {
    sensors: AHashMap<String, SensorRecord>,
    settings: HealthSettings,
    total_attempts: u64,
    successful: u64,
    failed: u64,
    last_update: Option<DateTime<Utc>>,
}

impl SensorHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: HealthSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &HealthSettings {
        &self.settings
    }

    /// Record one observation
    ///
    /// Counts as a success only when `success` is set and a value is present.
    /// Every call is a distinct observation; nothing is deduplicated.
    pub fn record(&mut self, sensor_id: &str, value: Option<DecodedValue>, success: bool) {
        let observation = match value {
            Some(value) if success => Observation::Success(value),
            _ => Observation::Failure(None),
        };
        self.record_at(sensor_id, observation, Utc::now());
    }

    pub fn record_success(&mut self, sensor_id: &str, value: DecodedValue) {
        self.record_at(sensor_id, Observation::Success(value), Utc::now());
    }

    pub fn record_failure(&mut self, sensor_id: &str, reason: impl Into<String>) {
        self.record_at(
            sensor_id,
            Observation::Failure(Some(reason.into())),
            Utc::now(),
        );
    }

    /// Record a decode result as returned by the register parser
    pub fn record_outcome(&mut self, sensor_id: &str, outcome: &Result<DecodedValue, DecodeError>) {
        self.record_at(sensor_id, Observation::from_outcome(outcome), Utc::now());
    }

    /// Record an observation with an explicit timestamp
    pub fn record_at(&mut self, sensor_id: &str, observation: Observation, at: DateTime<Utc>) {
        let history = self.settings.failure_history;
        let record = self
            .sensors
            .entry(sensor_id.to_string())
            .or_insert_with(|| {
                debug!(sensor = %sensor_id, "Tracking new sensor");
                SensorRecord::default()
            });

        record.attempts += 1;
        self.total_attempts += 1;

        match observation {
            Observation::Success(value) => {
                record.successes += 1;
                record.value_type = Some(value.type_tag());
                record.last_value = Some(value);
                record.last_success = Some(at);
                self.successful += 1;
                trace!(sensor = %sensor_id, "Recorded sensor success");
            },
            Observation::Failure(reason) => {
                record.failures += 1;
                record.last_failure = Some(at);
                if history > 0 {
                    while record.recent_failures.len() >= history {
                        record.recent_failures.pop_front();
                    }
                    record.recent_failures.push_back(FailureEntry {
                        timestamp: at,
                        reason: reason.clone(),
                    });
                }
                self.failed += 1;
                debug!(
                    sensor = %sensor_id,
                    failures = record.failures,
                    attempts = record.attempts,
                    reason = reason.as_deref().unwrap_or("no value"),
                    "Recorded sensor failure"
                );
            },
        }

        self.last_update = Some(at);
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Health detail for one sensor, `None` if it was never observed
    pub fn sensor(&self, sensor_id: &str) -> Option<SensorHealthDetail> {
        self.sensors
            .get(sensor_id)
            .map(|record| report::detail(sensor_id, record, &self.settings.thresholds))
    }

    /// Aggregate counts and classification tallies
    pub fn summary(&self) -> HealthSummary {
        report::summarize(
            self.sensors.values(),
            &self.settings.thresholds,
            self.total_attempts,
            self.successful,
            self.failed,
            self.last_update,
        )
    }

    /// Per-sensor breakdown, worst success rate first
    pub fn detailed_report(&self) -> Vec<SensorHealthDetail> {
        let mut details: Vec<SensorHealthDetail> = self
            .sensors
            .iter()
            .map(|(id, record)| report::detail(id, record, &self.settings.thresholds))
            .collect();
        details.sort_by(|a, b| {
            a.success_rate
                .total_cmp(&b.success_rate)
                .then_with(|| a.sensor_id.cmp(&b.sensor_id))
        });
        details
    }

    /// Text dashboard of the summary and problematic sensors
    pub fn dashboard(&self) -> String {
        report::render_dashboard(
            &self.summary(),
            &self.detailed_report(),
            &self.settings.thresholds,
        )
    }

    /// Text listing of every sensor's detail
    pub fn detailed_dashboard(&self) -> String {
        report::render_detailed(&self.detailed_report())
    }
}
