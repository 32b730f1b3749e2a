//! Metric classification: obsolete-field rules and topic extraction.
//!
//! Status and history snapshots are filtered down to the metrics relevant to
//! one topic (the monitor uses `ping`), with obsolete fields removed and the
//! two sources merged. History is merged second, so it wins on conflicts.

use crate::snapshot::MetricSnapshot;

/// The one `seconds_to_*` field still worth showing. It is force-included
/// from the status snapshot even though its name does not mention `ping`.
pub const EXCEPTION_FIELD: &str = "seconds_to_first_non_empty_slot";

/// Topic used by the ping monitor.
pub const PING_TOPIC: &str = "ping";

const OBSOLETE_SUBSTRING: &str = "snr";
const OBSOLETE_PREFIX: &str = "seconds_to_";

/// Whether a field is obsolete and should be hidden.
///
/// Rules, first match wins:
/// 1. [`EXCEPTION_FIELD`] (exact match) is never obsolete.
/// 2. Any name containing `snr`, case-insensitively, is obsolete.
/// 3. Any name starting with `seconds_to_` is obsolete.
pub fn is_obsolete_field(name: &str) -> bool {
    if name == EXCEPTION_FIELD {
        return false;
    }
    if name.to_lowercase().contains(OBSOLETE_SUBSTRING) {
        return true;
    }
    name.starts_with(OBSOLETE_PREFIX)
}

/// Whether `name` mentions `topic` (case-insensitive) and is not obsolete.
///
/// `topic` is expected in lowercase.
pub fn matches_topic(name: &str, topic: &str) -> bool {
    name.to_lowercase().contains(topic) && !is_obsolete_field(name)
}

/// Collect the non-obsolete metrics mentioning `topic` from both snapshots.
///
/// Absent snapshots behave exactly like empty ones. If status carries
/// [`EXCEPTION_FIELD`] it is always present in the result, with the status
/// value.
pub fn extract_topic_metrics(
    topic: &str,
    status: Option<&MetricSnapshot>,
    history: Option<&MetricSnapshot>,
) -> MetricSnapshot {
    let topic = topic.to_lowercase();
    let mut merged = MetricSnapshot::new();

    for snapshot in [status, history].into_iter().flatten() {
        for (name, value) in snapshot {
            if matches_topic(name, &topic) {
                merged.insert(name.clone(), value.clone());
            }
        }
    }

    if let Some(value) = status.and_then(|s| s.get(EXCEPTION_FIELD)) {
        merged.insert(EXCEPTION_FIELD.to_string(), value.clone());
    }

    merged
}

/// Ping statistics for the monitor: [`extract_topic_metrics`] over `ping`.
pub fn extract_ping_stats(
    status: Option<&MetricSnapshot>,
    history: Option<&MetricSnapshot>,
) -> MetricSnapshot {
    extract_topic_metrics(PING_TOPIC, status, history)
}
