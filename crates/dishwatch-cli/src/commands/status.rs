//! `dishwatch status`: sample basic dish status and summarize it.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use dishwatch_core::{
    DishProvider, STATUS_REPORT_PREFIX, SeriesSummary, StatusSample, UtcTime,
};

use super::{
    banner, ensure_reachable, install_interrupt, make_provider, save_report, seconds,
    sleep_while_running,
};
use crate::DishArgs;

pub fn run(args: &DishArgs, samples: usize, interval: f64) {
    let provider = make_provider(args, false);
    ensure_reachable(args, provider.as_ref());

    let interval = seconds(interval, Duration::from_secs(5));
    banner("EXPERIMENT 1: Basic Status Monitor");
    println!();
    println!(
        "Collecting status data every {}s ({samples} samples)...",
        interval.as_secs_f64()
    );
    println!("Press Ctrl+C to stop early");

    let running = install_interrupt();
    let results = collect(provider.as_ref(), samples, interval, &running);

    println!();
    banner("SUMMARY");
    if results.is_empty() {
        println!("No samples collected");
        return;
    }
    for line in summary_lines(&results) {
        println!("{line}");
    }
    save_report(args, STATUS_REPORT_PREFIX, &results);
}

/// Take up to `samples` readings. Failed readings are reported and skipped.
fn collect(
    provider: &dyn DishProvider,
    samples: usize,
    interval: Duration,
    running: &AtomicBool,
) -> Vec<StatusSample> {
    let mut results = Vec::with_capacity(samples);
    for i in 0..samples {
        let timestamp = UtcTime::now().iso8601();
        match provider.get_status() {
            Ok((status, errors)) => {
                let sample = StatusSample::from_status(timestamp, &status);
                println!();
                println!("[Sample {}/{samples}] @ {}", i + 1, sample.timestamp);
                for line in sample_lines(&sample) {
                    println!("  {line}");
                }
                if !errors.is_empty() {
                    println!("  Errors: {}", errors.join("; "));
                }
                results.push(sample);
            }
            Err(e) => println!("  Error collecting data: {e}"),
        }

        if i + 1 < samples && !sleep_while_running(interval, running) {
            println!();
            println!("Stopped by user");
            break;
        }
    }
    results
}

fn sample_lines(s: &StatusSample) -> Vec<String> {
    vec![
        format!("State: {}", s.state),
        format!(
            "Uptime: {} seconds ({:.1} hours)",
            s.uptime_seconds,
            s.uptime_seconds / 3600.0
        ),
        format!("Obstruction: {:.1}%", s.fraction_obstructed * 100.0),
        format!("Download: {:.2} Mbps", s.downlink_throughput_bps / 1e6),
        format!("Upload: {:.2} Mbps", s.uplink_throughput_bps / 1e6),
        format!("Latency: {:.1} ms", s.pop_ping_latency_ms),
    ]
}

fn mean_of(results: &[StatusSample], f: impl Fn(&StatusSample) -> f64) -> f64 {
    let values: Vec<f64> = results.iter().map(f).collect();
    SeriesSummary::from_samples(&values).map_or(0.0, |s| s.mean)
}

fn summary_lines(results: &[StatusSample]) -> Vec<String> {
    let download = mean_of(results, |s| s.downlink_throughput_bps);
    let upload = mean_of(results, |s| s.uplink_throughput_bps);
    let latency = mean_of(results, |s| s.pop_ping_latency_ms);
    let obstruction = mean_of(results, |s| s.fraction_obstructed);
    vec![
        format!("Samples collected: {}", results.len()),
        format!("Average download: {:.2} Mbps", download / 1e6),
        format!("Average upload: {:.2} Mbps", upload / 1e6),
        format!("Average latency: {latency:.1} ms"),
        format!("Average obstruction: {:.1}%", obstruction * 100.0),
    ]
}
