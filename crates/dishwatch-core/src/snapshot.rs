//! Metric snapshots and conversion from provider JSON.
//!
//! A snapshot is what one provider call returned: a flat, string-keyed map of
//! [`MetricValue`]s. Provider tools tend to emit nested camelCase JSON
//! (`{"dishGetStatus": {"popPingLatencyMs": 31.2}}`), so this module flattens
//! that into the snake_case names the classifier expects
//! (`pop_ping_latency_ms`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::stats::SeriesSummary;
use crate::value::MetricValue;

/// Metric name → value for one provider call. Ordered for stable display.
pub type MetricSnapshot = BTreeMap<String, MetricValue>;

/// Non-fatal problems reported alongside a snapshot.
pub type StatusErrors = Vec<String>;

/// Keys that may carry the per-wedge obstruction list, after normalization.
const WEDGE_KEYS: &[&str] = &[
    "snr",
    "wedge_fraction_obstructed",
    "wedge_abs_fraction_obstructed",
];

/// Per-wedge obstruction data. Wedge 0 faces North; wedges run clockwise in
/// 30° steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstructionMap {
    pub wedges: Vec<f64>,
}

/// Normalize a provider key to snake_case.
///
/// `popPingLatencyMs` → `pop_ping_latency_ms`, `GPS-Stats` → `gps_stats`.
/// Already-snake keys pass through unchanged.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower_or_digit = false;
    let mut prev_us = false;
    for ch in raw.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower_or_digit && !prev_us {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower_or_digit = false;
            prev_us = false;
        } else if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_lower_or_digit = true;
            prev_us = false;
        } else {
            if !prev_us {
                out.push('_');
            }
            prev_us = true;
            prev_lower_or_digit = false;
        }
    }
    out.trim_matches('_').to_string()
}

/// Strip the response wrapper: either a lone object member, or a
/// `dishGet*` object next to envelope scalars such as `apiVersion`.
fn unwrap_response(obj: &Map<String, Value>) -> &Map<String, Value> {
    if obj.len() == 1 {
        if let Some(Value::Object(inner)) = obj.values().next() {
            return inner;
        }
    }
    let mut responses = obj.iter().filter_map(|(key, value)| match value {
        Value::Object(inner) if normalize_key(key).starts_with("dish_get_") => Some(inner),
        _ => None,
    });
    match (responses.next(), responses.next()) {
        (Some(inner), None) => inner,
        _ => obj,
    }
}

fn flatten_into(prefix: &str, obj: &Map<String, Value>, out: &mut MetricSnapshot) {
    for (key, value) in obj {
        let name = if prefix.is_empty() {
            normalize_key(key)
        } else {
            format!("{prefix}_{}", normalize_key(key))
        };
        match value {
            Value::Object(inner) => flatten_into(&name, inner, out),
            other => {
                if let Some(v) = MetricValue::from_json(other) {
                    out.insert(name, v);
                }
            }
        }
    }
}

/// Flatten a provider JSON document into a snapshot.
///
/// Nested object keys are joined with `_`. Arrays are dropped. A non-object
/// document yields an empty snapshot.
pub fn flatten_json(doc: &Value) -> MetricSnapshot {
    let mut out = MetricSnapshot::new();
    if let Value::Object(obj) = doc {
        flatten_into("", unwrap_response(obj), &mut out);
    }
    out
}

/// Build an obstruction map from a provider JSON document.
pub fn obstruction_from_json(doc: &Value) -> ObstructionMap {
    let Value::Object(obj) = doc else {
        return ObstructionMap::default();
    };
    let mut wedges = Vec::new();
    for (key, value) in unwrap_response(obj) {
        let key = normalize_key(key);
        if !WEDGE_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Value::Array(items) = value {
            wedges = items.iter().filter_map(Value::as_f64).collect();
            break;
        }
    }

    ObstructionMap { wedges }
}

fn number_series(obj: &Map<String, Value>, name: &str) -> Vec<f64> {
    obj.iter()
        .find(|(key, _)| normalize_key(key) == name)
        .and_then(|(_, value)| value.as_array())
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

/// Build history ping stats from a provider JSON document.
///
/// Scalars are flattened as for status. The per-second `pop_ping_drop_rate`
/// and `pop_ping_latency_ms` rings of a `get_history` response are reduced to
/// `ping_drop_rate` and `ping_latency_ms_mean`; latency only counts seconds
/// where at least one ping came back.
pub fn history_from_json(doc: &Value) -> MetricSnapshot {
    let mut out = flatten_json(doc);
    let Value::Object(obj) = doc else {
        return out;
    };
    let obj = unwrap_response(obj);

    let drops = number_series(obj, "pop_ping_drop_rate");
    let latencies = number_series(obj, "pop_ping_latency_ms");

    if let Some(summary) = SeriesSummary::from_samples(&drops) {
        out.insert("ping_drop_rate".into(), MetricValue::Float(summary.mean));
        out.insert("samples".into(), MetricValue::Int(summary.count as i64));
    }
    let answered: Vec<f64> = latencies
        .iter()
        .enumerate()
        .filter(|(i, ms)| ms.is_finite() && drops.get(*i).is_none_or(|d| *d < 1.0))
        .map(|(_, ms)| *ms)
        .collect();
    if let Some(summary) = SeriesSummary::from_samples(&answered) {
        out.insert(
            "ping_latency_ms_mean".into(),
            MetricValue::Float(summary.mean),
        );
    }
    out
}

/// Numeric lookup with a fallback, as the experiments read optional fields.
pub fn get_f64(snapshot: &MetricSnapshot, name: &str, default: f64) -> f64 {
    snapshot
        .get(name)
        .and_then(MetricValue::as_f64)
        .unwrap_or(default)
}

/// Numeric lookup that keeps absence distinct from zero.
pub fn get_opt_f64(snapshot: &MetricSnapshot, name: &str) -> Option<f64> {
    snapshot.get(name).and_then(MetricValue::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_key_camel_case() {
        assert_eq!(normalize_key("popPingLatencyMs"), "pop_ping_latency_ms");
        assert_eq!(normalize_key("popPingDropRate"), "pop_ping_drop_rate");
        assert_eq!(
            normalize_key("secondsToFirstNonemptySlot"),
            "seconds_to_first_nonempty_slot"
        );
    }

    #[test]
    fn test_normalize_key_snake_passthrough() {
        assert_eq!(normalize_key("ping_drop_rate"), "ping_drop_rate");
        assert_eq!(
            normalize_key("seconds_to_first_non_empty_slot"),
            "seconds_to_first_non_empty_slot"
        );
    }

    #[test]
    fn test_normalize_key_separators() {
        assert_eq!(normalize_key("GPS-Stats"), "gps_stats");
        assert_eq!(normalize_key("  uptime  "), "uptime");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_flatten_unwraps_wrapper_and_nests() {
        let doc = json!({
            "dishGetStatus": {
                "popPingLatencyMs": 31.5,
                "state": "CONNECTED",
                "alerts": { "motorsStuck": false },
                "obstructionStats": { "fractionObstructed": 0.02 },
                "history": [1, 2, 3]
            }
        });
        let snap = flatten_json(&doc);
        assert_eq!(
            snap.get("pop_ping_latency_ms"),
            Some(&MetricValue::Float(31.5))
        );
        assert_eq!(snap.get("state"), Some(&MetricValue::from("CONNECTED")));
        assert_eq!(
            snap.get("alerts_motors_stuck"),
            Some(&MetricValue::Bool(false))
        );
        assert_eq!(
            snap.get("obstruction_stats_fraction_obstructed"),
            Some(&MetricValue::Float(0.02))
        );
        assert!(!snap.contains_key("history"));
    }

    #[test]
    fn test_flatten_flat_document() {
        let doc = json!({"ping_drop_rate": 0.01, "uptime": 3600});
        let snap = flatten_json(&doc);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get("uptime"), Some(&MetricValue::Int(3600)));
    }

    #[test]
    fn test_flatten_non_object_is_empty() {
        assert!(flatten_json(&json!([1, 2])).is_empty());
        assert!(flatten_json(&json!("nope")).is_empty());
    }

    #[test]
    fn test_obstruction_from_json_reads_snr_wedges() {
        let doc = json!({
            "dishGetObstructionMap": {
                "snr": [9.0, 8.5, 0.0, -1.0],
                "numRows": 123
            }
        });
        let map = obstruction_from_json(&doc);
        assert_eq!(map.wedges, vec![9.0, 8.5, 0.0, -1.0]);
    }

    #[test]
    fn test_obstruction_from_json_wedge_fraction_key() {
        let doc = json!({"wedgeFractionObstructed": [0.1, 0.0]});
        let map = obstruction_from_json(&doc);
        assert_eq!(map.wedges, vec![0.1, 0.0]);
    }

    #[test]
    fn test_obstruction_missing_wedges() {
        let map = obstruction_from_json(&json!({"other": 1}));
        assert!(map.wedges.is_empty());
    }

    #[test]
    fn test_response_next_to_envelope_scalars() {
        let doc = json!({
            "apiVersion": "25",
            "dishGetStatus": {
                "popPingLatencyMs": 31.5,
                "downlinkThroughputBps": 1e6,
                "deviceState": { "uptimeS": "7200" }
            }
        });
        let snap = flatten_json(&doc);
        assert_eq!(
            snap.get("pop_ping_latency_ms"),
            Some(&MetricValue::Float(31.5))
        );
        assert_eq!(get_f64(&snap, "downlink_throughput_bps", 0.0), 1e6);
        // proto3 JSON writes 64-bit integers as strings.
        assert_eq!(get_f64(&snap, "device_state_uptime_s", 0.0), 7200.0);
        assert!(!snap.contains_key("api_version"));
        assert!(snap.keys().all(|k| !k.starts_with("dish_get_status")));

        let map = obstruction_from_json(&json!({
            "apiVersion": "25",
            "dishGetObstructionMap": { "numRows": 2, "snr": [7.0, 6.5] }
        }));
        assert_eq!(map.wedges, vec![7.0, 6.5]);
    }

    #[test]
    fn test_plain_nested_object_is_not_a_wrapper() {
        let doc = json!({"ping_drop_rate": 0.0, "alerts": {"motorsStuck": true}});
        let snap = flatten_json(&doc);
        assert!(snap.contains_key("ping_drop_rate"));
        assert_eq!(
            snap.get("alerts_motors_stuck"),
            Some(&MetricValue::Bool(true))
        );
    }

    #[test]
    fn test_history_reduces_ping_rings() {
        let doc = json!({
            "apiVersion": "25",
            "dishGetHistory": {
                "current": "1234",
                "popPingDropRate": [0.0, 1.0, 0.5, 0.0],
                "popPingLatencyMs": [30.0, 0.0, 40.0, 50.0]
            }
        });
        let snap = history_from_json(&doc);
        assert_eq!(snap.get("ping_drop_rate"), Some(&MetricValue::Float(0.375)));
        assert_eq!(
            snap.get("ping_latency_ms_mean"),
            Some(&MetricValue::Float(40.0))
        );
        assert_eq!(snap.get("samples"), Some(&MetricValue::Int(4)));
    }

    #[test]
    fn test_history_flat_document_passes_through() {
        let snap = history_from_json(&json!({"ping_drop_rate": 0.02}));
        assert_eq!(snap.get("ping_drop_rate"), Some(&MetricValue::Float(0.02)));
        assert!(!snap.contains_key("ping_latency_ms_mean"));
    }

    #[test]
    fn test_get_f64_default() {
        let mut snap = MetricSnapshot::new();
        snap.insert("uptime".into(), MetricValue::Int(10));
        snap.insert("state".into(), MetricValue::from("CONNECTED"));
        assert_eq!(get_f64(&snap, "uptime", 0.0), 10.0);
        assert_eq!(get_f64(&snap, "state", -1.0), -1.0);
        assert_eq!(get_f64(&snap, "missing", 0.0), 0.0);
        assert_eq!(get_opt_f64(&snap, "missing"), None);
    }
}
