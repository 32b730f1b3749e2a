//! # dishwatch-core
//!
//! **Watch what your Starlink dish says about itself.**
//!
//! `dishwatch-core` turns the loosely-typed diagnostics a dish reports into
//! something stable enough to display and save: ping metrics picked out of the
//! status and history snapshots, obsolete fields dropped, values formatted the
//! same way every cycle.
//!
//! ## Quick Start
//!
//! ```
//! use dishwatch_core::{DemoProvider, poll_ping_cycle};
//!
//! let dish = DemoProvider::with_seed(42);
//! let cycle = poll_ping_cycle(&dish).unwrap();
//! for (name, value) in &cycle.stats {
//!     println!("{name}: {value}");
//! }
//! assert!(cycle.stats.contains_key("seconds_to_first_non_empty_slot"));
//! ```
//!
//! ## Architecture
//!
//! Provider → Snapshots (status, history) → Classify + merge → Display / Report
//!
//! Every data source implements the [`DishProvider`] trait and is handed to
//! callers explicitly:
//! - [`CommandProvider`] runs external commands (grpcurl by default) and
//!   flattens their JSON output.
//! - [`DemoProvider`] invents plausible data for offline demos.
//! - [`FakeProvider`] replays scripted responses in tests.

pub mod classify;
pub mod config;
pub mod connectivity;
pub mod monitor;
pub mod obstruction;
pub mod provider;
pub mod providers;
pub mod report;
pub mod snapshot;
pub mod stats;
pub mod timefmt;
pub mod value;

pub use classify::{
    EXCEPTION_FIELD, PING_TOPIC, extract_ping_stats, extract_topic_metrics, is_obsolete_field,
};
pub use config::{DEFAULT_DISH_HOST, DEFAULT_DISH_PORT, DishConfig, parse_command};
pub use connectivity::{UNREACHABLE_HINTS, check_dish_reachable};
pub use monitor::{PingCycle, poll_ping_cycle};
pub use obstruction::{ObstructionSeverity, WEDGE_DIRECTIONS, WedgeReading, label_wedges};
pub use provider::{DishProvider, Operation, ProviderError};
pub use providers::{CommandProvider, DemoProvider, FakeProvider};
pub use report::{
    OBSTRUCTION_REPORT_PREFIX, ObstructionReport, STATUS_REPORT_PREFIX, SavedReport,
    StatusSample, VARIABILITY_REPORT_PREFIX, VariabilitySample, write_json_report,
};
pub use snapshot::{MetricSnapshot, ObstructionMap, StatusErrors};
pub use stats::{Level, SeriesSummary};
pub use timefmt::UtcTime;
pub use value::{MetricValue, format_value};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
