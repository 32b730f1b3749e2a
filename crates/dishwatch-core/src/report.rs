//! Saved experiment reports.
//!
//! Each experiment writes one pretty-printed JSON document named
//! `{prefix}_{YYYYMMDD_HHMMSS}.json` (UTC). The document wraps the
//! experiment's records with a run id and the tool version.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::{MetricSnapshot, get_f64, get_opt_f64};
use crate::timefmt::UtcTime;
use crate::value::MetricValue;

pub const STATUS_REPORT_PREFIX: &str = "starlink_status";
pub const OBSTRUCTION_REPORT_PREFIX: &str = "starlink_obstruction";
pub const VARIABILITY_REPORT_PREFIX: &str = "starlink_variability";

// Field names differ between `starlink_grpc`-style flat output and grpcurl's
// nested output; the first name present wins.
const UPTIME: &[&str] = &["uptime", "device_state_uptime_s"];
const FRACTION_OBSTRUCTED: &[&str] = &[
    "fraction_obstructed",
    "obstruction_stats_fraction_obstructed",
];
const OBSTRUCTION_DURATION: &[&str] = &[
    "obstruction_duration",
    "obstruction_stats_avg_prolonged_obstruction_duration_s",
];
const OBSTRUCTION_INTERVAL: &[&str] = &[
    "obstruction_interval",
    "obstruction_stats_avg_prolonged_obstruction_interval_s",
];
const AZIMUTH: &[&str] = &["direction_azimuth", "boresight_azimuth_deg"];
const ELEVATION: &[&str] = &["direction_elevation", "boresight_elevation_deg"];

/// First numeric value among `names`.
pub fn lookup_f64(snapshot: &MetricSnapshot, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|n| get_opt_f64(snapshot, n))
}

fn state_of(status: &MetricSnapshot) -> String {
    status
        .get("state")
        .and_then(MetricValue::as_str)
        .unwrap_or("UNKNOWN")
        .to_string()
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One reading from the basic status monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSample {
    pub timestamp: String,
    pub state: String,
    pub uptime_seconds: f64,
    pub snr: Option<f64>,
    pub fraction_obstructed: f64,
    pub downlink_throughput_bps: f64,
    pub uplink_throughput_bps: f64,
    pub pop_ping_latency_ms: f64,
    pub alerts: f64,
}

impl StatusSample {
    pub fn from_status(timestamp: String, status: &MetricSnapshot) -> Self {
        Self {
            timestamp,
            state: state_of(status),
            uptime_seconds: lookup_f64(status, UPTIME).unwrap_or(0.0),
            snr: get_opt_f64(status, "snr"),
            fraction_obstructed: lookup_f64(status, FRACTION_OBSTRUCTED).unwrap_or(0.0),
            downlink_throughput_bps: get_f64(status, "downlink_throughput_bps", 0.0),
            uplink_throughput_bps: get_f64(status, "uplink_throughput_bps", 0.0),
            pop_ping_latency_ms: get_f64(status, "pop_ping_latency_ms", 0.0),
            alerts: get_f64(status, "alerts", 0.0),
        }
    }
}

/// One reading from the performance variability run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariabilitySample {
    pub timestamp: String,
    pub sample_number: usize,
    pub state: String,
    pub downlink_mbps: f64,
    pub uplink_mbps: f64,
    pub latency_ms: f64,
    pub ping_drop_rate: f64,
    pub fraction_obstructed: f64,
}

impl VariabilitySample {
    /// Build a sample. Without history the drop rate reads as zero; latency
    /// always comes from the status snapshot.
    pub fn from_snapshots(
        timestamp: String,
        sample_number: usize,
        status: &MetricSnapshot,
        history: Option<&MetricSnapshot>,
    ) -> Self {
        let ping_drop_rate = history.map_or(0.0, |h| get_f64(h, "ping_drop_rate", 0.0));
        Self {
            timestamp,
            sample_number,
            state: state_of(status),
            downlink_mbps: get_f64(status, "downlink_throughput_bps", 0.0) / 1e6,
            uplink_mbps: get_f64(status, "uplink_throughput_bps", 0.0) / 1e6,
            latency_ms: get_f64(status, "pop_ping_latency_ms", 0.0),
            ping_drop_rate,
            fraction_obstructed: lookup_f64(status, FRACTION_OBSTRUCTED).unwrap_or(0.0),
        }
    }
}

/// Result of the obstruction analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstructionReport {
    pub timestamp: String,
    pub fraction_obstructed: f64,
    pub obstruction_duration: Option<f64>,
    pub obstruction_interval: Option<f64>,
    pub azimuth: f64,
    pub elevation: f64,
    pub snr_map: Option<Vec<f64>>,
}

impl ObstructionReport {
    pub fn from_snapshots(timestamp: String, status: &MetricSnapshot, wedges: &[f64]) -> Self {
        Self {
            timestamp,
            fraction_obstructed: lookup_f64(status, FRACTION_OBSTRUCTED).unwrap_or(0.0),
            obstruction_duration: lookup_f64(status, OBSTRUCTION_DURATION),
            obstruction_interval: lookup_f64(status, OBSTRUCTION_INTERVAL),
            azimuth: lookup_f64(status, AZIMUTH).unwrap_or(0.0),
            elevation: lookup_f64(status, ELEVATION).unwrap_or(0.0),
            snr_map: (!wedges.is_empty()).then(|| wedges.to_vec()),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope + writer
// ---------------------------------------------------------------------------

/// Document written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedReport<T> {
    pub version: u32,
    pub run_id: String,
    pub kind: String,
    pub generated_at: String,
    pub dishwatch_version: String,
    pub records: T,
}

impl<T> SavedReport<T> {
    pub fn new(kind: &str, records: T) -> Self {
        Self {
            version: 1,
            run_id: Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            generated_at: UtcTime::now().iso8601(),
            dishwatch_version: crate::VERSION.to_string(),
            records,
        }
    }
}

/// File name for a report written at `at`.
pub fn report_file_name(prefix: &str, at: &UtcTime) -> String {
    format!("{prefix}_{}.json", at.file_stamp())
}

/// Write `records` as `{dir}/{prefix}_{stamp}.json`, creating `dir` if needed.
pub fn write_json_report<T: Serialize>(
    dir: &Path,
    prefix: &str,
    records: T,
) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let report = SavedReport::new(prefix, records);
    let path = dir.join(report_file_name(prefix, &UtcTime::now()));

    let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
    fs::write(&path, json)?;
    info!("saved {prefix} report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> MetricSnapshot {
        let mut s = MetricSnapshot::new();
        s.insert("state".into(), MetricValue::from("CONNECTED"));
        s.insert("uptime".into(), MetricValue::Int(7200));
        s.insert("fraction_obstructed".into(), MetricValue::Float(0.02));
        s.insert("downlink_throughput_bps".into(), MetricValue::Int(50_000_000));
        s.insert("uplink_throughput_bps".into(), MetricValue::Int(10_000_000));
        s.insert("pop_ping_latency_ms".into(), MetricValue::Float(27.5));
        s
    }

    #[test]
    fn test_status_sample_defaults() {
        let sample = StatusSample::from_status("t".into(), &MetricSnapshot::new());
        assert_eq!(sample.state, "UNKNOWN");
        assert_eq!(sample.uptime_seconds, 0.0);
        assert_eq!(sample.snr, None);
        assert_eq!(sample.pop_ping_latency_ms, 0.0);
    }

    #[test]
    fn test_status_sample_values() {
        let sample = StatusSample::from_status("t".into(), &status());
        assert_eq!(sample.state, "CONNECTED");
        assert_eq!(sample.uptime_seconds, 7200.0);
        assert_eq!(sample.fraction_obstructed, 0.02);
        assert_eq!(sample.downlink_throughput_bps, 50_000_000.0);
    }

    #[test]
    fn test_nested_aliases() {
        let mut s = MetricSnapshot::new();
        s.insert("device_state_uptime_s".into(), MetricValue::Int(99));
        s.insert(
            "obstruction_stats_fraction_obstructed".into(),
            MetricValue::Float(0.5),
        );
        let sample = StatusSample::from_status("t".into(), &s);
        assert_eq!(sample.uptime_seconds, 99.0);
        assert_eq!(sample.fraction_obstructed, 0.5);
    }

    #[test]
    fn test_variability_sample_history_fallback() {
        let s = status();
        let without = VariabilitySample::from_snapshots("t".into(), 1, &s, None);
        assert_eq!(without.ping_drop_rate, 0.0);
        assert_eq!(without.latency_ms, 27.5);
        assert_eq!(without.downlink_mbps, 50.0);
        assert_eq!(without.uplink_mbps, 10.0);

        let mut h = MetricSnapshot::new();
        h.insert("ping_drop_rate".into(), MetricValue::Float(0.03));
        let with = VariabilitySample::from_snapshots("t".into(), 2, &s, Some(&h));
        assert_eq!(with.ping_drop_rate, 0.03);
        assert_eq!(with.sample_number, 2);
    }

    #[test]
    fn test_obstruction_report_without_wedges() {
        let r = ObstructionReport::from_snapshots("t".into(), &status(), &[]);
        assert_eq!(r.snr_map, None);
        assert_eq!(r.obstruction_duration, None);
        assert_eq!(r.fraction_obstructed, 0.02);
    }

    #[test]
    fn test_report_file_name_shape() {
        let at = UtcTime::from_unix_secs(946_684_800);
        assert_eq!(
            report_file_name(STATUS_REPORT_PREFIX, &at),
            "starlink_status_20000101_000000.json"
        );
    }

    #[test]
    fn test_write_json_report() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("reports");
        let samples = vec![StatusSample::from_status("t".into(), &status())];
        let path = write_json_report(&dir, STATUS_REPORT_PREFIX, &samples).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("starlink_status_"));
        assert!(name.ends_with(".json"));
        // starlink_status_ + YYYYMMDD_HHMMSS + .json
        assert_eq!(name.len(), "starlink_status_".len() + 15 + 5);

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: SavedReport<Vec<StatusSample>> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.kind, STATUS_REPORT_PREFIX);
        assert_eq!(parsed.records, samples);
        assert!(!parsed.run_id.is_empty());
    }
}
