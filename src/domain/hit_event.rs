//! Redirect hit event model for asynchronous hit counting.

use chrono::{DateTime, Utc};

/// An in-memory record of one served redirect, queued for persistence.
///
/// Created by the routing layer after it acts on a matched rule and drained by
/// [`crate::domain::hit_worker::run_hit_worker`]. The timestamp is taken when
/// the redirect is served, not when the worker gets to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitEvent {
    pub rule_id: i64,
    pub hit_at: DateTime<Utc>,
}

impl HitEvent {
    /// Creates a hit event stamped with the current time.
    pub fn new(rule_id: i64) -> Self {
        Self {
            rule_id,
            hit_at: Utc::now(),
        }
    }
}
