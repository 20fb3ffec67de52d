//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::application::services::{AuthService, RedirectService};
use crate::domain::hit_worker::HitLogger;
use crate::infrastructure::cache::RedirectCache;

#[derive(Clone)]
pub struct AppState {
    pub redirect_cache: Arc<RedirectCache>,
    pub redirect_service: Arc<RedirectService>,
    pub auth_service: Arc<AuthService>,
    pub hit_logger: HitLogger,
}

impl AppState {
    pub fn new(
        redirect_cache: Arc<RedirectCache>,
        redirect_service: Arc<RedirectService>,
        auth_service: Arc<AuthService>,
        hit_logger: HitLogger,
    ) -> Self {
        Self {
            redirect_cache,
            redirect_service,
            auth_service,
            hit_logger,
        }
    }
}
