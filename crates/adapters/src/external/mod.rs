//! External user/post API adapters

mod http;

pub use http::{DEFAULT_BASE_URL, HttpExternalApi};

use async_trait::async_trait;
use post_sync_domain::{ExternalApi, ExternalApiError, Post, User};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stub external API for testing
#[derive(Debug, Default)]
pub struct StubExternalApi {
    users: HashMap<i64, User>,
    posts: HashMap<i64, Post>,
    failure: Option<String>,
    user_calls: AtomicUsize,
    post_calls: AtomicUsize,
}

impl StubExternalApi {
    /// Create a stub that knows no users or posts
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a stub where every call fails with a network error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, id: i64, name: impl Into<String>) -> Self {
        self.users.insert(
            id,
            User {
                id,
                name: name.into(),
            },
        );
        self
    }

    /// Register a post; it must carry an id
    pub fn with_post(mut self, post: Post) -> Self {
        if let Some(id) = post.id {
            self.posts.insert(id, post);
        }
        self
    }

    /// Number of user lookups served so far
    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    /// Number of post lookups served so far
    pub fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), ExternalApiError> {
        match &self.failure {
            Some(message) => Err(ExternalApiError::Network(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExternalApi for StubExternalApi {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, ExternalApiError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.users.get(&user_id).cloned())
    }

    async fn fetch_post(&self, id: i64) -> Result<Option<Post>, ExternalApiError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.posts.get(&id).cloned())
    }
}
