//! Report envelopes produced by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OrbisError;

/// Outcome of one successful refresh cycle.
///
/// Carries the shared cycle timestamp, write counts, and any non-fatal
/// warnings (rejected records, a failed summary render) collected on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Timestamp stamped on every row written by this cycle.
    pub last_refreshed_at: DateTime<Utc>,
    /// Rows written (inserted plus updated).
    pub processed: u64,
    /// Rows created by this cycle.
    pub inserted: u64,
    /// Existing rows overwritten by this cycle.
    pub updated: u64,
    /// Incoming records skipped for missing name or population.
    pub skipped: u64,
    /// Incoming records collapsed into a later record with the same name.
    pub duplicates: u64,
    /// Row count in the store after the commit.
    pub total: u64,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<OrbisError>,
    /// Whether the summary image was rendered successfully.
    pub summary_rendered: bool,
    /// Wall-clock duration of the cycle in milliseconds.
    pub elapsed_ms: u64,
}

impl RefreshReport {
    /// Number of per-record warnings (excludes the render warning).
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, OrbisError::RecordProcessing { .. }))
            .count()
    }
}

/// Snapshot of the singleton status record plus the current row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Completion time of the last successful refresh.
    pub last_updated: DateTime<Utc>,
    /// Row count at read time.
    pub total_countries: u64,
}
