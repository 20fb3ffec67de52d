//! Read-only cache diagnostics.

use serde::Serialize;
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

/// Point-in-time view of the redirect cache for health checks.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of normalized keys in the per-key tier, including cached misses.
    pub entries: usize,
    pub snapshot_loaded: bool,
    /// Rules held by the snapshot; zero when none is loaded.
    pub snapshot_rules: usize,
    /// Time since the snapshot was loaded, `None` if it never was.
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(rename = "snapshot_age_ms")]
    pub snapshot_age: Option<Duration>,
}
