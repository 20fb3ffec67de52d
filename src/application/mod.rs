//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the redirect cache and give HTTP
//! handlers a narrow API.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Rule management with cache invalidation
//! - [`services::auth_service::AuthService`] - Admin token authentication

pub mod services;
