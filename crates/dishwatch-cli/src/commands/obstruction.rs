//! `dishwatch obstruction`: directional obstruction analysis.

use log::warn;

use dishwatch_core::obstruction::bar;
use dishwatch_core::{
    DishProvider, OBSTRUCTION_REPORT_PREFIX, ObstructionReport, ObstructionSeverity, UtcTime,
    label_wedges,
};

use super::{banner, ensure_reachable, make_provider, save_report};
use crate::DishArgs;

pub fn run(args: &DishArgs) {
    let provider = make_provider(args, false);
    ensure_reachable(args, provider.as_ref());

    banner("EXPERIMENT 2: Obstruction Pattern Analysis");
    println!();

    let report = match analyze(provider.as_ref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error during analysis: {e}");
            std::process::exit(1);
        }
    };
    for line in render(&report) {
        println!("{line}");
    }
    save_report(args, OBSTRUCTION_REPORT_PREFIX, &report);
}

/// Read status and the obstruction map. A missing map only drops the
/// directional section.
fn analyze(provider: &dyn DishProvider) -> dishwatch_core::provider::Result<ObstructionReport> {
    let (status, _) = provider.get_status()?;
    let wedges = match provider.get_obstruction_map() {
        Ok((map, errors)) => {
            for e in &errors {
                warn!("obstruction map: {e}");
            }
            map.wedges
        }
        Err(e) => {
            warn!("obstruction map unavailable: {e}");
            Vec::new()
        }
    };
    Ok(ObstructionReport::from_snapshots(
        UtcTime::now().iso8601(),
        &status,
        &wedges,
    ))
}

fn render(report: &ObstructionReport) -> Vec<String> {
    let rule = "-".repeat(70);
    let mut out = vec!["OBSTRUCTION OVERVIEW".to_string(), rule.clone()];
    out.push(format!(
        "Total area obstructed: {:.1}%",
        report.fraction_obstructed * 100.0
    ));
    if let Some(d) = report.obstruction_duration.filter(|d| *d != 0.0) {
        out.push(format!("Average obstruction duration: {d:.1} seconds"));
    }
    if let Some(i) = report.obstruction_interval.filter(|i| *i != 0.0) {
        out.push(format!("Average interval between obstructions: {i:.1} seconds"));
    }

    out.push(String::new());
    out.push("DIRECTIONAL OBSTRUCTION MAP".to_string());
    out.push(rule.clone());
    out.push("(Looking up at the sky, North is 0°, rotating clockwise)".to_string());
    out.push(String::new());
    if let Some(map) = &report.snr_map {
        out.push("Signal Quality by Direction (higher is better):".to_string());
        for w in label_wedges(map) {
            out.push(format!("{:15} {:6.1} dB {}", w.direction, w.snr_db, bar(w.snr_db)));
        }
    } else {
        out.push("No obstruction map available".to_string());
    }

    out.push(String::new());
    out.push("DISH POINTING INFORMATION".to_string());
    out.push(rule.clone());
    out.push(format!("Dish azimuth: {:.1}° (from North)", report.azimuth));
    out.push(format!(
        "Dish elevation: {:.1}° (from horizontal)",
        report.elevation
    ));

    out.push(String::new());
    out.push("RECOMMENDATIONS".to_string());
    out.push(rule);
    let severity = ObstructionSeverity::from_fraction(report.fraction_obstructed);
    let mark = if severity.is_warning() { '⚠' } else { '✓' };
    out.push(format!("{mark} {}", severity.headline()));
    out.extend(severity.advice().iter().map(|line| format!("  {line}")));
    out
}
