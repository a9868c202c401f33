//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Post, User};

/// Error type for post store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for the local post store
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Look up a post by its identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError>;

    /// Insert or update a post, returning the stored record.
    /// A post without an id is assigned one by the store.
    async fn save(&self, post: &Post) -> Result<Post, StoreError>;

    /// Remove a post; removing a missing id is not an error
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    /// Every user id that owns at least one stored post
    async fn list_distinct_user_ids(&self) -> Result<BTreeSet<i64>, StoreError>;
}

/// Error type for external API calls
#[derive(Debug, Error)]
pub enum ExternalApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port for the external user/post API.
///
/// A resource the API does not know about is `Ok(None)`, never an error.
#[async_trait]
pub trait ExternalApi: Send + Sync {
    /// Fetch a user by id
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, ExternalApiError>;

    /// Fetch a post by id
    async fn fetch_post(&self, id: i64) -> Result<Option<Post>, ExternalApiError>;
}
