//! Thread-safe handle to a tracker

use std::sync::Arc;

use parking_lot::Mutex;
use register_codec::{DecodeError, DecodedValue};

use crate::report::{HealthSummary, SensorHealthDetail};
use crate::status::HealthSettings;
use crate::tracker::SensorHealth;

/// Cloneable tracker handle for concurrent pollers
///
/// Each call holds the lock for a single record or snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedSensorHealth {
    inner: Arc<Mutex<SensorHealth>>,
}

impl SharedSensorHealth {
    pub fn new(health: SensorHealth) -> Self {
        Self {
            inner: Arc::new(Mutex::new(health)),
        }
    }

    pub fn with_settings(settings: HealthSettings) -> Self {
        Self::new(SensorHealth::with_settings(settings))
    }

    pub fn record(&self, sensor_id: &str, value: Option<DecodedValue>, success: bool) {
        self.inner.lock().record(sensor_id, value, success);
    }

    pub fn record_failure(&self, sensor_id: &str, reason: impl Into<String>) {
        self.inner.lock().record_failure(sensor_id, reason);
    }

    pub fn record_outcome(&self, sensor_id: &str, outcome: &Result<DecodedValue, DecodeError>) {
        self.inner.lock().record_outcome(sensor_id, outcome);
    }

    pub fn sensor(&self, sensor_id: &str) -> Option<SensorHealthDetail> {
        self.inner.lock().sensor(sensor_id)
    }

    pub fn summary(&self) -> HealthSummary {
        self.inner.lock().summary()
    }

    pub fn detailed_report(&self) -> Vec<SensorHealthDetail> {
        self.inner.lock().detailed_report()
    }

    pub fn dashboard(&self) -> String {
        self.inner.lock().dashboard()
    }

    /// Run `f` with exclusive access to the tracker
    pub fn with<R>(&self, f: impl FnOnce(&mut SensorHealth) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Clone of the current tracker state
    pub fn snapshot(&self) -> SensorHealth {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_recording() {
        let shared = SharedSensorHealth::default();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.record("grid_freq", Some(DecodedValue::Number(50.0)), true);
                    }
                    shared.record(&format!("sensor_{i}"), None, false);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let summary = shared.summary();
        assert_eq!(summary.total_sensors, 5);
        assert_eq!(summary.total_reads, 104);
        assert_eq!(shared.sensor("grid_freq").unwrap().total_reads, 100);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedSensorHealth::default();
        shared.record("a", Some(DecodedValue::Number(1.0)), true);
        let snapshot = shared.snapshot();
        shared.with(|health| health.record_failure("a", "timeout"));
        assert_eq!(snapshot.sensor("a").unwrap().total_reads, 1);
        assert_eq!(shared.sensor("a").unwrap().total_reads, 2);
    }
}
