//! Simulated dish for demos and offline use.
//!
//! Values are drawn around a 28 ms base latency with a little jitter so the
//! monitor looks like it does against a healthy dish. The status snapshot also
//! carries obsolete fields (`snr`, `seconds_to_next_slot`) so the classifier
//! has something to throw away.

use std::cell::RefCell;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::provider::{DishProvider, Result};
use crate::snapshot::{MetricSnapshot, ObstructionMap, StatusErrors};
use crate::value::MetricValue;

const BASE_LATENCY_MS: f64 = 28.0;
const BASE_UPTIME_SECS: i64 = 86_400;
const WEDGES: usize = 12;

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Provider that invents plausible data.
pub struct DemoProvider {
    rng: RefCell<StdRng>,
    started: Instant,
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoProvider {
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_os_rng()),
            started: Instant::now(),
        }
    }

    /// Deterministic provider for tests and reproducible demos.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            started: Instant::now(),
        }
    }

    /// One cycle of simulated ping statistics.
    pub fn sample_ping_stats(&self) -> MetricSnapshot {
        let mut rng = self.rng.borrow_mut();
        let jitter: f64 = rng.random_range(-2.0..3.0);
        let latency = BASE_LATENCY_MS + jitter;

        let mut out = MetricSnapshot::new();
        let mut put = |name: &str, v: f64| {
            out.insert(name.to_string(), MetricValue::Float(v));
        };
        put("ping_drop_rate", round_to(rng.random_range(0.0..0.01), 5));
        put("ping_latency_ms_mean", round_to(latency, 3));
        put("ping_latency_ms_p50", round_to(latency - 1.0, 3));
        put("ping_latency_ms_p95", round_to(latency + 7.0, 3));
        put("ping_latency_ms_p99", round_to(latency + 14.0, 3));
        put("pop_ping_drop_rate", round_to(rng.random_range(0.0..0.005), 5));
        put("pop_ping_latency_ms", round_to(latency - 0.5, 3));
        put(
            "seconds_to_first_non_empty_slot",
            round_to(rng.random_range(0.0..0.1), 3),
        );
        out
    }
}

impl DishProvider for DemoProvider {
    fn name(&self) -> &str {
        "demo"
    }

    fn get_status(&self) -> Result<(MetricSnapshot, StatusErrors)> {
        let mut status = self.sample_ping_stats();
        let mut rng = self.rng.borrow_mut();

        let uptime = BASE_UPTIME_SECS + self.started.elapsed().as_secs() as i64;
        let entries: [(&str, MetricValue); 10] = [
            ("state", "CONNECTED".into()),
            ("uptime", uptime.into()),
            (
                "downlink_throughput_bps",
                round_to(rng.random_range(20e6..180e6), 0).into(),
            ),
            (
                "uplink_throughput_bps",
                round_to(rng.random_range(2e6..20e6), 0).into(),
            ),
            (
                "fraction_obstructed",
                round_to(rng.random_range(0.0..0.02), 4).into(),
            ),
            ("direction_azimuth", round_to(rng.random_range(-5.0..5.0), 1).into()),
            (
                "direction_elevation",
                round_to(rng.random_range(60.0..70.0), 1).into(),
            ),
            ("alerts", MetricValue::Int(0)),
            ("snr", round_to(rng.random_range(8.0..9.5), 2).into()),
            (
                "seconds_to_next_slot",
                round_to(rng.random_range(0.0..15.0), 3).into(),
            ),
        ];
        for (name, value) in entries {
            status.insert(name.to_string(), value);
        }
        Ok((status, StatusErrors::new()))
    }

    fn get_obstruction_map(&self) -> Result<(ObstructionMap, StatusErrors)> {
        let mut rng = self.rng.borrow_mut();
        let wedges = (0..WEDGES)
            .map(|_| round_to(rng.random_range(4.0..9.5), 1))
            .collect();
        Ok((ObstructionMap { wedges }, StatusErrors::new()))
    }

    fn history_ping_stats(&self) -> Result<MetricSnapshot> {
        let mut rng = self.rng.borrow_mut();
        let latency = BASE_LATENCY_MS + rng.random_range(-1.0..2.0);
        let sent: i64 = 900;
        let dropped: i64 = rng.random_range(0..5);

        let mut out = MetricSnapshot::new();
        out.insert("samples".into(), MetricValue::Int(sent));
        out.insert(
            "ping_drop_rate".into(),
            MetricValue::Float(round_to(dropped as f64 / sent as f64, 5)),
        );
        out.insert(
            "ping_latency_ms_mean".into(),
            MetricValue::Float(round_to(latency, 3)),
        );
        out.insert("ping_packets_sent".into(), MetricValue::Int(sent));
        out.insert(
            "ping_packets_received".into(),
            MetricValue::Int(sent - dropped),
        );
        Ok(out)
    }

    fn requires_dish(&self) -> bool {
        false
    }
}
