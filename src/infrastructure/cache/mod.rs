//! Caching layer for redirect lookups.
//!
//! - [`RedirectCache`] - Snapshot + per-key cache over the redirect store
//! - [`CacheEntry`] - Value with load timestamp
//! - [`CacheStats`] - Diagnostics for health checks

mod entry;
mod redirect_cache;
mod stats;

pub use entry::CacheEntry;
pub use redirect_cache::{DEFAULT_LOAD_TIMEOUT, RedirectCache};
pub use stats::CacheStats;
