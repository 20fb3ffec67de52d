//! PostgreSQL repository implementations.
//!
//! # Repositories
//!
//! - [`PgRedirectRepository`] - Redirect rule storage, hit counting and CRUD

pub mod pg_redirect_repository;

pub use pg_redirect_repository::PgRedirectRepository;
