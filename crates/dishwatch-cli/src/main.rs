//! CLI for dishwatch: live ping statistics and quick experiments against a
//! Starlink dish.

mod commands;
mod display;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dishwatch")]
#[command(about = "dishwatch: watch what your Starlink dish says about itself")]
#[command(version = dishwatch_core::VERSION)]
struct Cli {
    #[command(flatten)]
    dish: DishArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct DishArgs {
    /// Dish address
    #[arg(long, global = true, default_value = dishwatch_core::DEFAULT_DISH_HOST)]
    host: String,

    /// Dish gRPC port
    #[arg(long, global = true, default_value_t = dishwatch_core::DEFAULT_DISH_PORT)]
    port: u16,

    /// Skip the TCP reachability check before starting
    #[arg(long, global = true)]
    skip_check: bool,

    /// Use simulated dish data instead of a real dish
    #[arg(long, global = true)]
    demo: bool,

    /// Command printing status JSON (default: grpcurl get_status)
    #[arg(long, global = true)]
    status_cmd: Option<String>,

    /// Command printing history JSON (default: grpcurl get_history)
    #[arg(long, global = true)]
    history_cmd: Option<String>,

    /// Command printing obstruction map JSON (default: grpcurl dish_get_obstruction_map)
    #[arg(long, global = true)]
    obstruction_cmd: Option<String>,

    /// Per-command timeout in seconds
    #[arg(long, global = true, default_value = "5.0")]
    command_timeout_sec: f64,

    /// Directory for saved JSON reports
    #[arg(long, global = true, default_value = ".")]
    output_dir: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Live ping statistics monitor (refreshes every second until Ctrl+C)
    Ping {
        /// Poll interval in seconds
        #[arg(long, default_value = "1.0")]
        interval: f64,
    },

    /// The ping monitor over simulated data; no dish required
    Demo {
        /// Poll interval in seconds
        #[arg(long, default_value = "1.0")]
        interval: f64,
    },

    /// Experiment 1: sample basic status, summarize, save JSON
    Status {
        /// Number of samples to take
        #[arg(long, default_value = "12")]
        samples: usize,

        /// Seconds between samples
        #[arg(long, default_value = "5.0")]
        interval: f64,
    },

    /// Experiment 2: directional obstruction analysis, save JSON
    Obstruction,

    /// Experiment 3: performance variability over time, save JSON
    Variability {
        /// Number of samples to take
        #[arg(long, default_value = "12")]
        samples: usize,

        /// Seconds between samples
        #[arg(long, default_value = "10.0")]
        interval: f64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ping { interval } => commands::ping::run(&cli.dish, interval, false),
        Commands::Demo { interval } => commands::ping::run(&cli.dish, interval, true),
        Commands::Status { samples, interval } => {
            commands::status::run(&cli.dish, samples, interval)
        }
        Commands::Obstruction => commands::obstruction::run(&cli.dish),
        Commands::Variability { samples, interval } => {
            commands::variability::run(&cli.dish, samples, interval)
        }
    }
}
