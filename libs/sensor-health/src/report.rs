//! Health reports and text dashboards

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use register_codec::DecodedValue;
use serde::Serialize;

use crate::status::{HealthStatus, HealthThresholds};
use crate::tracker::{FailureEntry, SensorRecord};

const RULE_WIDTH: usize = 60;
/// Type label for sensors that never produced a value
const NO_VALUE_TYPE: &str = "none";

/// Health detail for a single sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorHealthDetail {
    pub sensor_id: String,
    pub total_reads: u64,
    pub successful: u64,
    pub failed: u64,
    /// Fraction in `[0.0, 1.0]`
    pub success_rate: f64,
    pub status: HealthStatus,
    pub last_value: Option<DecodedValue>,
    pub value_type: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    /// Oldest first
    pub recent_failures: Vec<FailureEntry>,
}

/// Aggregate over every tracked sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub total_sensors: usize,
    pub total_reads: u64,
    pub successful_reads: u64,
    pub failed_reads: u64,
    /// Fraction in `[0.0, 1.0]`; zero when nothing was recorded
    pub overall_success_rate: f64,
    pub healthy_sensors: usize,
    pub degraded_sensors: usize,
    pub unhealthy_sensors: usize,
    /// Sensor count per type tag of the last successful value
    pub value_types: BTreeMap<String, usize>,
    pub last_update: Option<DateTime<Utc>>,
}

impl HealthSummary {
    pub fn is_empty(&self) -> bool {
        self.total_sensors == 0
    }
}

pub(crate) fn detail(
    sensor_id: &str,
    record: &SensorRecord,
    thresholds: &HealthThresholds,
) -> SensorHealthDetail {
    let success_rate = record.success_rate().unwrap_or(0.0);
    SensorHealthDetail {
        sensor_id: sensor_id.to_string(),
        total_reads: record.attempts,
        successful: record.successes,
        failed: record.failures,
        success_rate,
        status: thresholds.classify(success_rate),
        last_value: record.last_value.clone(),
        value_type: record.value_type.map(str::to_string),
        last_success: record.last_success,
        last_failure: record.last_failure,
        recent_failures: record.recent_failures.iter().cloned().collect(),
    }
}

pub(crate) fn summarize<'a>(
    records: impl Iterator<Item = &'a SensorRecord>,
    thresholds: &HealthThresholds,
    total_reads: u64,
    successful_reads: u64,
    failed_reads: u64,
    last_update: Option<DateTime<Utc>>,
) -> HealthSummary {
    let mut summary = HealthSummary {
        total_sensors: 0,
        total_reads,
        successful_reads,
        failed_reads,
        overall_success_rate: if total_reads > 0 {
            successful_reads as f64 / total_reads as f64
        } else {
            0.0
        },
        healthy_sensors: 0,
        degraded_sensors: 0,
        unhealthy_sensors: 0,
        value_types: BTreeMap::new(),
        last_update,
    };

    for record in records {
        summary.total_sensors += 1;
        if let Some(rate) = record.success_rate() {
            match thresholds.classify(rate) {
                HealthStatus::Healthy => summary.healthy_sensors += 1,
                HealthStatus::Degraded => summary.degraded_sensors += 1,
                HealthStatus::Unhealthy => summary.unhealthy_sensors += 1,
            }
        }
        let type_tag = record.value_type.unwrap_or(NO_VALUE_TYPE);
        *summary.value_types.entry(type_tag.to_string()).or_default() += 1;
    }

    summary
}

fn percent(fraction: f64) -> f64 {
    fraction * 100.0
}

fn rule(out: &mut String, ch: char) {
    out.extend(std::iter::repeat(ch).take(RULE_WIDTH));
    out.push('\n');
}

/// Render the summary dashboard
///
/// `details` is expected worst-first; only non-healthy sensors are listed.
pub(crate) fn render_dashboard(
    summary: &HealthSummary,
    details: &[SensorHealthDetail],
    thresholds: &HealthThresholds,
) -> String {
    let mut out = String::new();
    rule(&mut out, '=');
    out.push_str("SENSOR HEALTH DASHBOARD\n");
    rule(&mut out, '=');

    if summary.is_empty() {
        out.push_str("No sensor data recorded yet\n");
        rule(&mut out, '=');
        return out;
    }

    let healthy = percent(thresholds.healthy);
    let degraded = percent(thresholds.degraded);

    // Writing to a String cannot fail
    let _ = writeln!(out, "Total Sensors: {}", summary.total_sensors);
    let _ = writeln!(
        out,
        "Total Reads: {} ({} ok, {} failed)",
        summary.total_reads, summary.successful_reads, summary.failed_reads
    );
    let _ = writeln!(
        out,
        "Success Rate: {:.2}%",
        percent(summary.overall_success_rate)
    );
    out.push('\n');
    out.push_str("Sensor Status:\n");
    let _ = writeln!(
        out,
        "  {} Healthy (>={healthy:.0}%): {}",
        HealthStatus::Healthy.marker(),
        summary.healthy_sensors
    );
    let _ = writeln!(
        out,
        "  {} Degraded ({degraded:.0}-{healthy:.0}%): {}",
        HealthStatus::Degraded.marker(),
        summary.degraded_sensors
    );
    let _ = writeln!(
        out,
        "  {} Unhealthy (<{degraded:.0}%): {}",
        HealthStatus::Unhealthy.marker(),
        summary.unhealthy_sensors
    );

    if let Some(last_update) = summary.last_update {
        out.push('\n');
        let _ = writeln!(
            out,
            "Last Update: {}",
            last_update.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    let problematic: Vec<&SensorHealthDetail> = details
        .iter()
        .filter(|d| d.status != HealthStatus::Healthy)
        .collect();
    if !problematic.is_empty() {
        out.push('\n');
        out.push_str("Problematic Sensors:\n");
        for d in problematic {
            let _ = writeln!(
                out,
                "  {} {}: {:.1}% ({}/{})",
                d.status.marker(),
                d.sensor_id,
                percent(d.success_rate),
                d.successful,
                d.total_reads
            );
        }
    }

    out.push('\n');
    out.push_str("Sensor Value Types:\n");
    for (type_tag, count) in &summary.value_types {
        let _ = writeln!(out, "  {type_tag}: {count}");
    }
    rule(&mut out, '=');
    out
}

/// Render one block per sensor
pub(crate) fn render_detailed(details: &[SensorHealthDetail]) -> String {
    let mut out = String::new();
    rule(&mut out, '=');
    out.push_str("DETAILED SENSOR HEALTH REPORT\n");
    rule(&mut out, '=');

    if details.is_empty() {
        out.push_str("No sensor data recorded yet\n");
        rule(&mut out, '=');
        return out;
    }

    for d in details {
        let _ = writeln!(out, "{} {}", d.status.marker(), d.sensor_id);
        let _ = writeln!(
            out,
            "  Success Rate: {:.1}% ({}/{}, {} failed)",
            percent(d.success_rate),
            d.successful,
            d.total_reads,
            d.failed
        );
        let value = d
            .last_value
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let _ = writeln!(
            out,
            "  Last Value: {value} ({})",
            d.value_type.as_deref().unwrap_or(NO_VALUE_TYPE)
        );
        if let Some(last_failure) = d.recent_failures.last() {
            let _ = writeln!(
                out,
                "  Last Failure: {} {}",
                last_failure.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                last_failure.reason.as_deref().unwrap_or("no value")
            );
        }
        rule(&mut out, '-');
    }
    out
}
