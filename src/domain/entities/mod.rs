//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`RedirectRule`] - A configured redirect from one path to another
//! - [`RedirectKind`] - Permanent or temporary redirect semantics
//!
//! Creation and partial updates use the separate [`NewRedirectRule`] and
//! [`RedirectRulePatch`] structs.

pub mod redirect_rule;

pub use redirect_rule::{
    NewRedirectRule, RedirectKind, RedirectRule, RedirectRulePatch, UnknownRedirectKind,
};
