//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod cache;
pub mod health;
pub mod pages;
pub mod redirects;

pub use cache::{cache_stats_handler, invalidate_cache_handler};
pub use health::health_handler;
pub use pages::page_not_found_handler;
pub use redirects::{
    create_redirect_handler, delete_redirect_handler, get_redirect_handler,
    redirect_list_handler, update_redirect_handler,
};
