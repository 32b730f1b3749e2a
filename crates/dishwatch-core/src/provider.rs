//! The dish data source, as seen by the rest of the crate.
//!
//! Every provider implements [`DishProvider`]. Callers receive the provider as
//! an explicit `&dyn DishProvider`, so tests swap in a
//! [`FakeProvider`](crate::providers::fake::FakeProvider) and the CLI can pick
//! the command-backed or demo provider at startup.

use std::time::Duration;

use thiserror::Error;

use crate::snapshot::{MetricSnapshot, ObstructionMap, StatusErrors};

/// Shared result type for provider calls.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Why a provider call produced no data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("no command configured for {0}")]
    NotConfigured(Operation),
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("`{command}` timed out after {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse provider output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which provider operation a call was for. Used in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Status,
    ObstructionMap,
    HistoryPingStats,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::ObstructionMap => "obstruction map",
            Self::HistoryPingStats => "history ping stats",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait that every dish data source must implement.
pub trait DishProvider {
    /// Short identifier for logs (e.g. `"command"`, `"demo"`).
    fn name(&self) -> &str;

    /// Current status snapshot plus any non-fatal errors.
    fn get_status(&self) -> Result<(MetricSnapshot, StatusErrors)>;

    /// Per-wedge obstruction data plus any non-fatal errors.
    fn get_obstruction_map(&self) -> Result<(ObstructionMap, StatusErrors)>;

    /// Ping statistics computed over the dish's history buffer.
    fn history_ping_stats(&self) -> Result<MetricSnapshot>;

    /// Whether this provider talks to real hardware and needs the
    /// reachability pre-check.
    fn requires_dish(&self) -> bool {
        true
    }
}
