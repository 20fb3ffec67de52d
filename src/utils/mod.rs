//! Utility functions shared across layers.
//!
//! - [`path_normalizer`] - Request path decoding and canonical cache keys

pub mod path_normalizer;
