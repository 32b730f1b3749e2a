//! Integration tests for dishwatch-core.
//!
//! These tests drive the full pipeline through the public API:
//! provider → ping cycle → classification → report on disk.

use dishwatch_core::{
    DemoProvider, DishProvider, FakeProvider, MetricSnapshot, MetricValue, ProviderError,
    STATUS_REPORT_PREFIX, SavedReport, StatusSample, UtcTime, VARIABILITY_REPORT_PREFIX,
    VariabilitySample, extract_ping_stats, format_value, is_obsolete_field, poll_ping_cycle,
    write_json_report,
};

fn snapshot(entries: &[(&str, MetricValue)]) -> MetricSnapshot {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn obsolete_rules_match_documented_examples() {
    assert!(is_obsolete_field("snr"));
    assert!(is_obsolete_field("SNR"));
    assert!(is_obsolete_field("seconds_to_next_slot"));
    assert!(!is_obsolete_field("seconds_to_first_non_empty_slot"));
    assert!(!is_obsolete_field("ping_drop_rate"));
    assert!(!is_obsolete_field("pop_ping_latency_ms"));
}

#[test]
fn scripted_dish_over_several_cycles() {
    let fake = FakeProvider::new();
    fake.push_status(
        snapshot(&[
            ("state", MetricValue::from("CONNECTED")),
            ("pop_ping_latency_ms", MetricValue::Float(27.3)),
            ("seconds_to_first_non_empty_slot", MetricValue::Float(0.5)),
        ]),
        vec![],
    );
    fake.push_history(snapshot(&[("ping_latency_ms_mean", MetricValue::Float(29.1))]));
    fake.push_status_error(ProviderError::Unavailable("dish rebooting".into()));
    fake.push_status(
        snapshot(&[("ping_drop_rate", MetricValue::Float(1.0))]),
        vec!["stale data".into()],
    );

    let first = poll_ping_cycle(&fake).unwrap();
    assert_eq!(first.stats.len(), 3);
    assert!(first.history_available);
    assert!(!first.stats.contains_key("state"));

    assert!(poll_ping_cycle(&fake).is_err());

    // History queue is exhausted by now: the third cycle runs without it.
    let third = poll_ping_cycle(&fake).unwrap();
    assert!(!third.history_available);
    assert_eq!(third.status_errors, vec!["stale data".to_string()]);
    assert_eq!(
        third.stats.get("ping_drop_rate").map(format_value),
        Some("1.000".to_string())
    );
}

#[test]
fn demo_provider_cycle_has_only_ping_fields() {
    let demo = DemoProvider::with_seed(11);
    let cycle = poll_ping_cycle(&demo).unwrap();
    assert!(cycle.history_available);
    for name in cycle.stats.keys() {
        assert!(
            name.to_lowercase().contains("ping") || name == "seconds_to_first_non_empty_slot",
            "unexpected field {name}"
        );
        assert!(!is_obsolete_field(name));
    }
}

#[test]
fn history_overrides_status_through_public_api() {
    let status = snapshot(&[("ping_x", MetricValue::Int(1))]);
    let history = snapshot(&[("ping_x", MetricValue::Int(2))]);
    let merged = extract_ping_stats(Some(&status), Some(&history));
    assert_eq!(merged.get("ping_x"), Some(&MetricValue::Int(2)));
}

#[test]
fn status_report_round_trip_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let demo = DemoProvider::with_seed(5);

    let mut samples = Vec::new();
    for _ in 0..3 {
        let (status, _) = demo.get_status().unwrap();
        samples.push(StatusSample::from_status(UtcTime::now().iso8601(), &status));
    }

    let path = write_json_report(tmp.path(), STATUS_REPORT_PREFIX, &samples).unwrap();
    let parsed: SavedReport<Vec<StatusSample>> =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(parsed.records.len(), 3);
    assert!(parsed.records.iter().all(|s| s.state == "CONNECTED"));
    assert!(parsed.records.iter().all(|s| s.snr.is_some()));
}

#[test]
fn variability_report_uses_history_drop_rate() {
    let tmp = tempfile::tempdir().unwrap();
    let demo = DemoProvider::with_seed(8);
    let (status, _) = demo.get_status().unwrap();
    let history = demo.history_ping_stats().unwrap();

    let sample = VariabilitySample::from_snapshots(
        UtcTime::now().iso8601(),
        1,
        &status,
        Some(&history),
    );
    assert_eq!(
        Some(sample.ping_drop_rate),
        history.get("ping_drop_rate").and_then(MetricValue::as_f64)
    );

    let path = write_json_report(tmp.path(), VARIABILITY_REPORT_PREFIX, vec![sample]).unwrap();
    assert!(path.exists());
}
