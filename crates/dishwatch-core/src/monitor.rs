//! One polling cycle of the ping monitor.

use log::debug;

use crate::classify::extract_ping_stats;
use crate::provider::{DishProvider, Result};
use crate::snapshot::{MetricSnapshot, StatusErrors};

/// What one cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PingCycle {
    /// Merged, filtered ping metrics.
    pub stats: MetricSnapshot,
    /// Non-fatal errors reported with the status snapshot.
    pub status_errors: StatusErrors,
    /// Whether history ping stats contributed to `stats`.
    pub history_available: bool,
}

/// Poll status and history once and extract the ping metrics.
///
/// A status failure fails the cycle. A history failure is only logged; the
/// cycle continues as if no history existed.
pub fn poll_ping_cycle(provider: &dyn DishProvider) -> Result<PingCycle> {
    let (status, status_errors) = provider.get_status()?;

    let history = match provider.history_ping_stats() {
        Ok(h) => Some(h),
        Err(e) => {
            debug!("{}: history ping stats unavailable: {e}", provider.name());
            None
        }
    };

    Ok(PingCycle {
        stats: extract_ping_stats(Some(&status), history.as_ref()),
        status_errors,
        history_available: history.is_some(),
    })
}
