#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo, extract::Request, middleware};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tour_redirects::application::services::auth_service::hash_token;
use tour_redirects::application::services::{AuthService, RedirectService};
use tour_redirects::domain::entities::{
    NewRedirectRule, RedirectKind, RedirectRule, RedirectRulePatch,
};
use tour_redirects::domain::hit_event::HitEvent;
use tour_redirects::domain::hit_worker::HitLogger;
use tour_redirects::domain::repositories::RedirectRepository;
use tour_redirects::error::AppError;
use tour_redirects::infrastructure::cache::RedirectCache;
use tour_redirects::state::AppState;
use tour_redirects::utils::path_normalizer::normalize_path;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// In-memory redirect store with call counters and failure switches.
#[derive(Default)]
pub struct FakeRedirectRepository {
    rules: Mutex<Vec<RedirectRule>>,
    next_id: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub hit_calls: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_hits: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
    hit_delay: Mutex<Option<Duration>>,
    hits_in_flight: AtomicUsize,
    peak_hits_in_flight: AtomicUsize,
}

/// Tracks one running `record_hit`, including ones cancelled by a timeout.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeRedirectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<RedirectRule>) -> Self {
        let next_id = rules.iter().map(|r| r.id).max().unwrap_or(0) as usize;
        let repo = Self::default();
        *repo.rules.lock().unwrap() = rules;
        repo.next_id.store(next_id, Ordering::SeqCst);
        repo
    }

    /// Adds a rule behind the cache's back, as a direct database edit would.
    pub fn insert(&self, rule: RedirectRule) {
        self.rules.lock().unwrap().push(rule);
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_hits(&self, fail: bool) {
        self.fail_hits.store(fail, Ordering::SeqCst);
    }

    pub fn set_fetch_delay(&self, delay: Option<Duration>) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    pub fn set_hit_delay(&self, delay: Option<Duration>) {
        *self.hit_delay.lock().unwrap() = delay;
    }

    /// Highest number of `record_hit` calls observed running at once.
    pub fn peak_hits_in_flight(&self) -> usize {
        self.peak_hits_in_flight.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn hit_count(&self) -> usize {
        self.hit_calls.load(Ordering::SeqCst)
    }

    pub fn rule(&self, id: i64) -> Option<RedirectRule> {
        self.rules.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    fn unavailable() -> AppError {
        AppError::internal("Database error", json!({ "reason": "store unavailable" }))
    }

    fn source_taken(rules: &[RedirectRule], source: &str, except: Option<i64>) -> bool {
        let key = normalize_path(source);
        rules
            .iter()
            .any(|r| r.is_active && Some(r.id) != except && normalize_path(&r.source_path) == key)
    }
}

#[async_trait]
impl RedirectRepository for FakeRedirectRepository {
    async fn fetch_active(&self) -> Result<Vec<RedirectRule>, AppError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }

        Ok(self
            .rules
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }

    async fn record_hit(&self, id: i64, hit_at: DateTime<Utc>) -> Result<(), AppError> {
        self.hit_calls.fetch_add(1, Ordering::SeqCst);

        let running = self.hits_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight(&self.hits_in_flight);
        self.peak_hits_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *self.hit_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_hits.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }

        if let Some(rule) = self.rules.lock().unwrap().iter_mut().find(|r| r.id == id) {
            rule.hit_count += 1;
            rule.last_hit_at = Some(rule.last_hit_at.map_or(hit_at, |t| t.max(hit_at)));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RedirectRule>, AppError> {
        Ok(self.rules.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RedirectRule>, AppError> {
        Ok(self.rule(id))
    }

    async fn create(&self, new_rule: NewRedirectRule) -> Result<RedirectRule, AppError> {
        let mut rules = self.rules.lock().unwrap();

        if new_rule.is_active && Self::source_taken(&rules, &new_rule.source_path, None) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "redirect_rules_active_source_idx" }),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let mut rule = RedirectRule::new(
            id,
            new_rule.source_path,
            new_rule.destination_path,
            new_rule.kind,
        );
        rule.is_active = new_rule.is_active;
        rules.push(rule.clone());

        Ok(rule)
    }

    async fn update(&self, id: i64, patch: RedirectRulePatch) -> Result<RedirectRule, AppError> {
        let mut rules = self.rules.lock().unwrap();

        let Some(index) = rules.iter().position(|r| r.id == id) else {
            return Err(AppError::not_found(
                "Redirect rule not found",
                json!({ "id": id }),
            ));
        };

        let mut updated = rules[index].clone();
        if let Some(source) = patch.source_path {
            updated.source_path = source;
        }
        if let Some(destination) = patch.destination_path {
            updated.destination_path = destination;
        }
        if let Some(kind) = patch.kind {
            updated.kind = kind;
        }
        if let Some(active) = patch.is_active {
            updated.is_active = active;
        }

        if updated.is_active && Self::source_taken(&rules, &updated.source_path, Some(id)) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "redirect_rules_active_source_idx" }),
            ));
        }

        updated.updated_at = Utc::now();
        rules[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rules = self.rules.lock().unwrap();
        let before = rules.len();
        rules.retain(|r| r.id != id);
        Ok(rules.len() < before)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(())
    }
}

pub fn permanent(id: i64, source: &str, destination: &str) -> RedirectRule {
    RedirectRule::new(id, source, destination, RedirectKind::Permanent)
}

pub fn temporary(id: i64, source: &str, destination: &str) -> RedirectRule {
    RedirectRule::new(id, source, destination, RedirectKind::Temporary)
}

pub fn create_test_cache(repo: Arc<FakeRedirectRepository>, ttl: Duration) -> Arc<RedirectCache> {
    Arc::new(RedirectCache::new(repo, ttl).with_load_timeout(Duration::from_secs(1)))
}

/// Builds application state over the fake store.
///
/// The hit receiver is returned undrained so tests can inspect queued hits.
pub fn create_test_state(
    repo: Arc<FakeRedirectRepository>,
) -> (AppState, mpsc::Receiver<HitEvent>) {
    let cache = create_test_cache(repo.clone(), Duration::from_secs(300));
    let (hit_logger, hit_rx) = HitLogger::channel(100);

    let redirect_service = Arc::new(RedirectService::new(repo, cache.clone()));
    let auth_service = Arc::new(
        AuthService::new(
            SIGNING_SECRET.to_string(),
            &hash_token(SIGNING_SECRET, ADMIN_TOKEN),
        )
        .unwrap(),
    );

    let state = AppState::new(cache, redirect_service, auth_service, hit_logger);
    (state, hit_rx)
}

/// Stands in for `into_make_service_with_connect_info` so the per-IP rate
/// limiter can find a peer address.
pub fn with_peer_addr(router: Router) -> Router {
    router.layer(middleware::map_request(|mut req: Request| async move {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req
    }))
}

pub fn bearer() -> String {
    format!("Bearer {ADMIN_TOKEN}")
}
