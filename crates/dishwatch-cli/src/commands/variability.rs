//! `dishwatch variability`: how stable is the link over a few minutes.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use log::debug;

use dishwatch_core::stats::{
    distinct_states, grade_jitter, grade_variability, jitter_advice, variability_advice,
};
use dishwatch_core::{
    DishProvider, Level, SeriesSummary, UtcTime, VARIABILITY_REPORT_PREFIX, VariabilitySample,
};

use super::{
    banner, ensure_reachable, install_interrupt, make_provider, save_report, seconds,
    sleep_while_running,
};
use crate::DishArgs;

pub fn run(args: &DishArgs, samples: usize, interval: f64) {
    let provider = make_provider(args, false);
    ensure_reachable(args, provider.as_ref());

    let interval = seconds(interval, Duration::from_secs(10));
    banner("EXPERIMENT 3: Performance Variability Analysis");
    println!();
    println!(
        "Measuring performance every {}s ({samples} samples)...",
        interval.as_secs_f64()
    );
    println!("This will show you how stable your connection is");
    println!();

    let running = install_interrupt();
    let results = collect(provider.as_ref(), samples, interval, &running);

    println!();
    banner("VARIABILITY ANALYSIS");
    if results.len() < 2 {
        println!("Not enough samples for analysis ({} collected)", results.len());
        return;
    }
    for line in analysis_lines(&results) {
        println!("{line}");
    }
    save_report(args, VARIABILITY_REPORT_PREFIX, &results);
}

fn collect(
    provider: &dyn DishProvider,
    samples: usize,
    interval: Duration,
    running: &AtomicBool,
) -> Vec<VariabilitySample> {
    let mut results = Vec::with_capacity(samples);
    for i in 0..samples {
        let timestamp = UtcTime::now().iso8601();
        match provider.get_status() {
            Ok((status, _)) => {
                let history = match provider.history_ping_stats() {
                    Ok(h) => Some(h),
                    Err(e) => {
                        debug!("sample {}: no history ping stats: {e}", i + 1);
                        None
                    }
                };
                let sample =
                    VariabilitySample::from_snapshots(timestamp, i + 1, &status, history.as_ref());
                println!("{}", row(&sample, samples));
                results.push(sample);
            }
            Err(e) => println!("  Error collecting sample {}: {e}", i + 1),
        }

        if i + 1 < samples && !sleep_while_running(interval, running) {
            println!();
            println!("Stopped by user");
            break;
        }
    }
    results
}

fn row(s: &VariabilitySample, total: usize) -> String {
    format!(
        "[{:2}/{total}] {:12} | ↓{:6.2} Mbps | ↑{:5.2} Mbps | {:5.1} ms | Drop: {:4.1}%",
        s.sample_number,
        s.state,
        s.downlink_mbps,
        s.uplink_mbps,
        s.latency_ms,
        s.ping_drop_rate * 100.0
    )
}

fn series(results: &[VariabilitySample], f: impl Fn(&VariabilitySample) -> f64) -> Option<SeriesSummary> {
    let values: Vec<f64> = results.iter().map(f).collect();
    SeriesSummary::from_samples(&values)
}

fn throughput_block(out: &mut Vec<String>, title: &str, s: &SeriesSummary) {
    out.push(String::new());
    out.push(format!("{title}:"));
    out.push(format!("  Mean: {:.2} Mbps", s.mean));
    out.push(format!("  Min: {:.2} Mbps", s.min));
    out.push(format!("  Max: {:.2} Mbps", s.max));
    if let Some(sd) = s.std_dev {
        out.push(format!("  Std Dev: {sd:.2} Mbps"));
    }
    if let Some(cv) = s.coefficient_of_variation_pct {
        out.push(format!("  Coefficient of Variation: {cv:.1}%"));
    }
}

fn verdict(out: &mut Vec<String>, level: Level, (headline, advice): (&str, &str)) {
    let mark = if level == Level::Low { '✓' } else { '⚠' };
    out.push(format!("{mark} {headline}"));
    out.push(format!("  {advice}"));
}

/// Summaries and stability assessment. Needs at least one sample.
fn analysis_lines(results: &[VariabilitySample]) -> Vec<String> {
    let mut out = Vec::new();
    let (Some(down), Some(up), Some(latency)) = (
        series(results, |s| s.downlink_mbps),
        series(results, |s| s.uplink_mbps),
        series(results, |s| s.latency_ms),
    ) else {
        return out;
    };

    throughput_block(&mut out, "Download Speed", &down);
    throughput_block(&mut out, "Upload Speed", &up);

    out.push(String::new());
    out.push("Latency:".to_string());
    out.push(format!("  Mean: {:.1} ms", latency.mean));
    out.push(format!("  Min: {:.1} ms", latency.min));
    out.push(format!("  Max: {:.1} ms", latency.max));
    if let Some(sd) = latency.std_dev {
        out.push(format!("  Std Dev: {sd:.1} ms"));
        out.push(format!("  Jitter (approx): {sd:.1} ms"));
    }

    out.push(String::new());
    out.push("STABILITY ASSESSMENT".to_string());
    out.push("-".repeat(70));

    let states = distinct_states(results.iter().map(|s| s.state.as_str()));
    if states.len() > 1 {
        let seen: Vec<&str> = states.into_iter().collect();
        out.push("⚠ Connection state changed during monitoring".to_string());
        out.push(format!("  States observed: {}", seen.join(", ")));
    } else {
        out.push(format!("✓ Connection remained stable: {}", results[0].state));
    }

    if let Some(cv) = down.coefficient_of_variation_pct {
        let level = grade_variability(cv);
        verdict(&mut out, level, variability_advice(level));
    }
    if let Some(jitter) = latency.std_dev {
        let level = grade_jitter(jitter);
        verdict(&mut out, level, jitter_advice(level));
    }
    out
}
