//! Two-tier in-process cache answering "does this path redirect?".

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::entry::CacheEntry;
use super::stats::CacheStats;
use crate::domain::entities::RedirectRule;
use crate::domain::repositories::RedirectRepository;
use crate::utils::path_normalizer::normalize_path;

/// Default upper bound for a single store fetch.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

type Snapshot = Arc<Vec<RedirectRule>>;

#[derive(Default)]
struct CacheState {
    /// Normalized path -> matched rule, or `None` for a cached miss.
    by_key: HashMap<String, CacheEntry<Option<RedirectRule>>>,
    snapshot: Option<CacheEntry<Snapshot>>,
    /// Bumped by every invalidation; loads started under an older generation
    /// must not write back.
    generation: u64,
}

impl CacheState {
    /// Replaces both tiers with a freshly fetched rule set.
    fn install(&mut self, rules: Snapshot) {
        let mut by_key = HashMap::with_capacity(rules.len());

        for rule in rules.iter() {
            match by_key.entry(normalize_path(&rule.source_path)) {
                Entry::Vacant(slot) => {
                    slot.insert(CacheEntry::new(Some(rule.clone())));
                }
                Entry::Occupied(slot) => {
                    warn!(
                        key = %slot.key(),
                        rule_id = rule.id,
                        "Duplicate active redirect source, keeping the first rule returned by the store"
                    );
                }
            }
        }

        self.by_key = by_key;
        self.snapshot = Some(CacheEntry::new(rules));
    }
}

/// Caches active redirect rules in front of a [`RedirectRepository`].
///
/// Two tiers share one lock:
///
/// - a **snapshot** of every active rule with a single load timestamp
/// - a **per-key** map from normalized path to rule-or-absence, each entry
///   with its own timestamp
///
/// Lookups served from a fresh per-key entry never touch the store. Anything
/// else goes through [`load_all_redirects`](Self::load_all_redirects), which
/// reloads the whole snapshot once it is older than the TTL. When the store
/// fails or times out, the previous snapshot keeps being served.
///
/// Concurrent lookups racing on an expired snapshot may each reload it. Every
/// write replaces whole entries, so the last writer wins.
///
/// Rule mutations must be followed by [`invalidate`](Self::invalidate); the
/// cache has no other way to learn about them.
pub struct RedirectCache {
    repository: Arc<dyn RedirectRepository>,
    ttl: Duration,
    load_timeout: Duration,
    state: RwLock<CacheState>,
}

impl RedirectCache {
    /// Creates an empty cache. Nothing is loaded until the first lookup.
    pub fn new(repository: Arc<dyn RedirectRepository>, ttl: Duration) -> Self {
        Self {
            repository,
            ttl,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Sets the upper bound for a single store fetch.
    ///
    /// A fetch that exceeds it is treated like a failed one.
    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolves a raw request path to its redirect rule, if any.
    ///
    /// `None` means "no redirect"; store problems never surface here.
    pub async fn check_redirect(&self, path: &str) -> Option<RedirectRule> {
        let key = normalize_path(path);

        {
            let state = self.state.read().await;
            if let Some(entry) = state.by_key.get(&key)
                && entry.is_fresh(self.ttl)
            {
                metrics::counter!("redirect_cache_hits_total").increment(1);
                return entry.value.clone();
            }
        }

        metrics::counter!("redirect_cache_misses_total").increment(1);

        let (rules, generation) = self.snapshot().await;
        let matched = rules
            .iter()
            .find(|rule| normalize_path(&rule.source_path) == key)
            .cloned();

        let mut state = self.state.write().await;
        if state.generation == generation {
            state.by_key.insert(key, CacheEntry::new(matched.clone()));
        }

        matched
    }

    /// Returns the best-known set of active rules.
    ///
    /// Serves the held snapshot while it is fresh. Otherwise fetches from the
    /// store; on failure the previous snapshot is returned unchanged, which is
    /// empty if no load ever succeeded.
    pub async fn load_all_redirects(&self) -> Arc<Vec<RedirectRule>> {
        self.snapshot().await.0
    }

    /// Drops both tiers so the next lookup reloads from the store.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.by_key.clear();
        state.snapshot = None;
        state.generation = state.generation.wrapping_add(1);

        info!("Redirect cache invalidated");
    }

    /// Reports tier sizes and snapshot age without touching the store.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;

        CacheStats {
            entries: state.by_key.len(),
            snapshot_loaded: state.snapshot.is_some(),
            snapshot_rules: state.snapshot.as_ref().map_or(0, |s| s.value.len()),
            snapshot_age: state.snapshot.as_ref().map(CacheEntry::age),
        }
    }

    /// Returns the snapshot to match against and the generation it belongs to.
    async fn snapshot(&self) -> (Snapshot, u64) {
        let generation = {
            let state = self.state.read().await;
            if let Some(snapshot) = &state.snapshot
                && snapshot.is_fresh(self.ttl)
            {
                return (snapshot.value.clone(), state.generation);
            }
            state.generation
        };

        let failure = match tokio::time::timeout(self.load_timeout, self.repository.fetch_active())
            .await
        {
            Ok(Ok(rules)) => {
                let rules: Snapshot = Arc::new(rules);
                let mut state = self.state.write().await;

                if state.generation == generation {
                    state.install(rules.clone());
                    info!(rules = rules.len(), "Loaded redirect rules");
                } else {
                    debug!("Cache invalidated during load, not storing loaded rules");
                }

                return (rules, generation);
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.load_timeout.as_millis()),
        };

        metrics::counter!("redirect_store_failures_total").increment(1);

        let state = self.state.read().await;
        match &state.snapshot {
            Some(stale) => {
                error!(
                    error = %failure,
                    stale_rules = stale.value.len(),
                    age_secs = stale.age().as_secs(),
                    "Failed to load redirect rules, serving stale snapshot"
                );
                (stale.value.clone(), state.generation)
            }
            None => {
                error!(
                    error = %failure,
                    "Failed to load redirect rules and no snapshot is held"
                );
                (Snapshot::default(), state.generation)
            }
        }
    }
}
