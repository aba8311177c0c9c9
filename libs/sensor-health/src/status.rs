//! Health classification

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default success rate at or above which a sensor is healthy
pub const DEFAULT_HEALTHY_THRESHOLD: f64 = 0.95;
/// Default success rate at or above which a sensor is degraded
pub const DEFAULT_DEGRADED_THRESHOLD: f64 = 0.80;
/// Default number of failures kept per sensor
pub const DEFAULT_FAILURE_HISTORY: usize = 50;

/// Health status of a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Success rate at or above the healthy threshold
    Healthy,
    /// Success rate between the degraded and healthy thresholds
    Degraded,
    /// Success rate below the degraded threshold
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }

    /// Short marker used in text dashboards
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Healthy => "[OK]",
            Self::Degraded => "[WARN]",
            Self::Unhealthy => "[FAIL]",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Success-rate boundaries, both inclusive at the lower end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub healthy: f64,
    pub degraded: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            healthy: DEFAULT_HEALTHY_THRESHOLD,
            degraded: DEFAULT_DEGRADED_THRESHOLD,
        }
    }
}

impl HealthThresholds {
    /// Classify a success rate in `[0.0, 1.0]`
    pub fn classify(&self, success_rate: f64) -> HealthStatus {
        if success_rate >= self.healthy {
            HealthStatus::Healthy
        } else if success_rate >= self.degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        }
    }

    /// Check ordering and bounds; returns a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        for (label, value) in [("healthy", self.healthy), ("degraded", self.degraded)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{label} threshold {value} must be within [0, 1]"));
            }
        }
        if self.degraded > self.healthy {
            return Err(format!(
                "degraded threshold {} exceeds healthy threshold {}",
                self.degraded, self.healthy
            ));
        }
        Ok(())
    }
}

/// Tracker settings, usually part of the monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    pub thresholds: HealthThresholds,
    /// Failures kept per sensor; oldest dropped first
    pub failure_history: usize,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            thresholds: HealthThresholds::default(),
            failure_history: DEFAULT_FAILURE_HISTORY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries_inclusive() {
        let thresholds = HealthThresholds::default();
        assert_eq!(thresholds.classify(1.0), HealthStatus::Healthy);
        assert_eq!(thresholds.classify(0.95), HealthStatus::Healthy);
        assert_eq!(thresholds.classify(0.949), HealthStatus::Degraded);
        assert_eq!(thresholds.classify(0.80), HealthStatus::Degraded);
        assert_eq!(thresholds.classify(0.799), HealthStatus::Unhealthy);
        assert_eq!(thresholds.classify(0.0), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_validate() {
        assert!(HealthThresholds::default().validate().is_ok());
        assert!(HealthThresholds {
            healthy: 0.5,
            degraded: 0.9
        }
        .validate()
        .is_err());
        assert!(HealthThresholds {
            healthy: 1.5,
            degraded: 0.9
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(HealthStatus::Degraded.to_string(), "degraded");
        assert_eq!(HealthStatus::Unhealthy.marker(), "[FAIL]");
    }
}
