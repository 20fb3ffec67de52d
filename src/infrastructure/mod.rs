//! Infrastructure layer for external integrations.
//!
//! Implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - In-process redirect cache
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;
