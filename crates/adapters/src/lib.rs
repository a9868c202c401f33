//! post-sync adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `store`: SQLite and in-memory post stores
//! - `external`: HTTP client for the external user/post API
//! - `http_api`: axum REST transport driving the post service

mod store_memory;
mod store_sqlite;

pub mod external;
pub mod http_api;

/// Re-exports for store adapters
pub mod store {
    pub use crate::store_memory::InMemoryPostRepository;
    pub use crate::store_sqlite::SqlitePostRepository;
}
