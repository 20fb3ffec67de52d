//! Domain layer containing business entities and logic.
//!
//! Independent of infrastructure concerns: entities, repository contracts,
//! and the redirect hit pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`hit_event`] - Redirect hit event model
//! - [`hit_worker`] - Asynchronous hit counting worker
//!
//! # Hit Processing Flow
//!
//! 1. The redirect middleware serves a matched rule
//! 2. [`hit_worker::HitLogger::log_hit`] enqueues a [`hit_event::HitEvent`]
//! 3. [`hit_worker::run_hit_worker`] persists it via
//!    [`repositories::RedirectRepository::record_hit`]

pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
