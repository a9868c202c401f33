//! In-memory post store for testing and ephemeral serving

use async_trait::async_trait;
use post_sync_domain::{Post, PostRepository, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    posts: BTreeMap<i64, Post>,
    last_id: i64,
}

/// In-memory post store implementation
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    inner: RwLock<Inner>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with posts; each must carry an id
    pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let mut inner = Inner::default();
        for post in posts {
            if let Some(id) = post.id {
                inner.last_id = inner.last_id.max(id);
                inner.posts.insert(id, post);
            }
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Number of stored posts
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.posts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(inner.posts.get(&id).cloned())
    }

    async fn save(&self, post: &Post) -> Result<Post, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let id = match post.id {
            Some(id) => id,
            None => inner
                .last_id
                .checked_add(1)
                .ok_or_else(|| StoreError::Database("Post id space exhausted".to_string()))?,
        };
        inner.last_id = inner.last_id.max(id);

        let stored = Post {
            id: Some(id),
            ..post.clone()
        };
        inner.posts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        inner.posts.remove(&id);
        Ok(())
    }

    async fn list_distinct_user_ids(&self) -> Result<BTreeSet<i64>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(inner.posts.values().map(|post| post.user_id).collect())
    }
}
