pub mod obstruction;
pub mod ping;
pub mod status;
pub mod variability;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use dishwatch_core::{
    CommandProvider, DemoProvider, DishConfig, DishProvider, UNREACHABLE_HINTS,
    check_dish_reachable, parse_command, write_json_report,
};

use crate::DishArgs;

/// Build the provider config from the shared flags.
///
/// Command overrides replace the grpcurl defaults; an empty override disables
/// that operation.
pub fn build_config(args: &DishArgs) -> DishConfig {
    let mut config = DishConfig::new(&args.host, args.port);
    config.command_timeout = seconds(args.command_timeout_sec, config.command_timeout);
    if let Some(line) = &args.status_cmd {
        config.status_command = parse_command(line);
    }
    if let Some(line) = &args.obstruction_cmd {
        config.obstruction_command = parse_command(line);
    }
    if let Some(line) = &args.history_cmd {
        config.history_command = parse_command(line);
    }
    config
}

/// Pick the data source: simulated when `demo` (or `--demo`) is set,
/// otherwise the command-backed provider.
pub fn make_provider(args: &DishArgs, demo: bool) -> Box<dyn DishProvider> {
    if demo || args.demo {
        Box::new(DemoProvider::new())
    } else {
        Box::new(CommandProvider::new(build_config(args)))
    }
}

/// Exit with the troubleshooting hints if the dish port is closed.
pub fn ensure_reachable(args: &DishArgs, provider: &dyn DishProvider) {
    if args.skip_check || !provider.requires_dish() {
        return;
    }
    let config = build_config(args);
    println!(
        "Checking Starlink dish connectivity at {}...",
        config.host
    );
    if let Err(e) = check_dish_reachable(&config.host, config.port, config.connect_timeout) {
        log::debug!("reachability check failed: {e}");
        println!("ERROR: Cannot reach Starlink dish at {}", config.address());
        println!("Please ensure:");
        for (i, hint) in UNREACHABLE_HINTS.iter().enumerate() {
            println!("  {}. {hint}", i + 1);
        }
        std::process::exit(1);
    }
    println!("✓ Dish is reachable");
    println!();
}

/// Install the Ctrl+C handler. The returned flag goes false on interrupt.
pub fn install_interrupt() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl+C handler: {e}");
        std::process::exit(1);
    }
    running
}

/// Sleep for `dur` in short slices. Returns false if interrupted.
pub fn sleep_while_running(dur: Duration, running: &AtomicBool) -> bool {
    let deadline = Instant::now() + dur;
    while Instant::now() < deadline {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    running.load(Ordering::SeqCst)
}

/// Seconds flag to a `Duration`, falling back on negative or non-finite input.
pub fn seconds(secs: f64, fallback: Duration) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(fallback)
}

/// Write a report under `--output-dir` and tell the user where it went.
pub fn save_report<T: Serialize>(args: &DishArgs, prefix: &str, records: T) -> Option<PathBuf> {
    match write_json_report(Path::new(&args.output_dir), prefix, records) {
        Ok(path) => {
            println!();
            println!("Data saved to: {}", path.display());
            Some(path)
        }
        Err(e) => {
            eprintln!("Error saving report: {e}");
            None
        }
    }
}

/// Section header used by the experiment commands.
pub fn banner(title: &str) {
    println!("{}", "=".repeat(70));
    println!("{title}");
    println!("{}", "=".repeat(70));
}
