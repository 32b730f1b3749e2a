//! `dishwatch ping` / `dishwatch demo`: live ping statistics monitor.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use log::warn;

use dishwatch_core::{DishProvider, UtcTime, poll_ping_cycle};

use super::{ensure_reachable, install_interrupt, make_provider, seconds, sleep_while_running};
use crate::DishArgs;
use crate::display;

/// Run the monitor until Ctrl+C.
pub fn run(args: &DishArgs, interval: f64, demo: bool) {
    let provider = make_provider(args, demo);
    let demo = !provider.requires_dish();

    if demo {
        println!("Starlink Ping Statistics Monitor - DEMO MODE");
    } else {
        println!("Starlink Ping Statistics Monitor");
    }
    println!("{}", display::rule());
    println!();
    ensure_reachable(args, provider.as_ref());
    println!("Starting monitor... (Press Ctrl+C to stop)");

    let running = install_interrupt();
    let interval = seconds(interval, Duration::from_secs(1));
    let iterations = if sleep_while_running(Duration::from_secs(2), &running) {
        monitor_loop(provider.as_ref(), interval, &running, demo)
    } else {
        0
    };
    print!("{}", display::stopped_screen(iterations, demo));
}

/// Poll, render, sleep until `running` goes false. Returns the iteration count.
fn monitor_loop(
    provider: &dyn DishProvider,
    interval: Duration,
    running: &AtomicBool,
    demo: bool,
) -> u64 {
    let mut iteration = 0u64;
    loop {
        iteration += 1;
        display::show(&render_cycle(provider, iteration, demo));
        if !sleep_while_running(interval, running) {
            return iteration;
        }
    }
}

/// One cycle's screen. Collection failures render as the error screen.
fn render_cycle(provider: &dyn DishProvider, iteration: u64, demo: bool) -> String {
    let timestamp = UtcTime::now().display();
    match poll_ping_cycle(provider) {
        Ok(cycle) => display::ping_screen(
            &cycle.stats,
            &cycle.status_errors,
            &timestamp,
            iteration,
            demo,
        ),
        Err(e) => {
            warn!("{}: cycle {iteration} failed: {e}", provider.name());
            display::error_screen(&e.to_string(), &timestamp, iteration, demo)
        }
    }
}
