//! Post resolution use case - coordinates the local store with the external API

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    model::Post,
    ports::{ExternalApi, ExternalApiError, PostRepository, StoreError},
};

/// Broad failure class, used by transports to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced user or post does not exist
    NotFound,
    /// The external API call could not be completed
    ExternalFailure,
    /// The local store failed
    StoreFailure,
    /// The request itself is unusable
    InvalidInput,
}

/// Errors from the post service
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    #[error("User with ID: {user_id} does not exist")]
    UserNotFound { user_id: i64 },
    #[error("Post with ID: {id} does not exist")]
    PostNotFound { id: i64 },
    #[error("{message}")]
    ExternalApi {
        message: String,
        #[source]
        source: ExternalApiError,
    },
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PostServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound { .. } | Self::PostNotFound { .. } => ErrorKind::NotFound,
            Self::ExternalApi { .. } => ErrorKind::ExternalFailure,
            Self::Store(_) => ErrorKind::StoreFailure,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Post service wired to trait objects, as used by the transports
pub type DynPostService = PostService<dyn PostRepository, dyn ExternalApi>;

/// Resolves posts against the local store first and the external API second.
///
/// Holds no state of its own. Two concurrent updates of the same post race and
/// the last write wins.
pub struct PostService<R, A>
where
    R: PostRepository + ?Sized,
    A: ExternalApi + ?Sized,
{
    repository: Arc<R>,
    external_api: Arc<A>,
}

impl<R, A> Clone for PostService<R, A>
where
    R: PostRepository + ?Sized,
    A: ExternalApi + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            external_api: Arc::clone(&self.external_api),
        }
    }
}

impl<R, A> PostService<R, A>
where
    R: PostRepository + ?Sized,
    A: ExternalApi + ?Sized,
{
    pub fn new(repository: Arc<R>, external_api: Arc<A>) -> Self {
        Self {
            repository,
            external_api,
        }
    }

    /// Create a post after checking that its user exists externally.
    ///
    /// The user check always runs before anything is written. Any `id` sent by
    /// the caller is dropped so the store assigns one.
    pub async fn create(&self, post: Post) -> Result<Post, PostServiceError> {
        let user_id = post.user_id;

        tracing::debug!(user_id, "Verifying user before creating post");

        let user = self
            .external_api
            .fetch_user(user_id)
            .await
            .map_err(|source| PostServiceError::ExternalApi {
                message: format!("Failed to verify user with ID: {}", user_id),
                source,
            })?;

        if user.is_none() {
            return Err(PostServiceError::UserNotFound { user_id });
        }

        let saved = self.repository.save(&Post { id: None, ..post }).await?;

        tracing::debug!(post_id = ?saved.id, user_id, "Created post");

        Ok(saved)
    }

    /// Get a post, falling back to the external API and storing what it returns.
    ///
    /// Every failure is returned as an error; `Ok(None)` is never produced here
    /// but stays part of the contract for callers that suppress not-found.
    pub async fn get(&self, id: i64) -> Result<Option<Post>, PostServiceError> {
        if let Some(post) = self.repository.find_by_id(id).await? {
            tracing::debug!(post_id = id, "Post served from local store");
            return Ok(Some(post));
        }

        tracing::debug!(post_id = id, "Post not stored locally, querying external API");

        let fetched = self
            .external_api
            .fetch_post(id)
            .await
            .map_err(|source| PostServiceError::ExternalApi {
                message: format!("Failed to fetch post from external API with ID: {}", id),
                source,
            })?;

        let Some(mut post) = fetched else {
            return Err(PostServiceError::PostNotFound { id });
        };

        // Keep the payload's id; only fill it in when the API left it out
        post.id.get_or_insert(id);

        let saved = self.repository.save(&post).await?;

        tracing::debug!(post_id = ?saved.id, "Stored externally sourced post");

        Ok(Some(saved))
    }

    /// Overwrite title and body of an existing post.
    ///
    /// The target is resolved through [`Self::get`], so a post known only to the
    /// external API is adopted into the store. `user_id` in the payload is ignored.
    pub async fn update(&self, updated: Post) -> Result<Option<Post>, PostServiceError> {
        let Some(id) = updated.id else {
            return Err(PostServiceError::InvalidInput(
                "post id is required for update".to_string(),
            ));
        };

        let Some(existing) = self.get(id).await? else {
            return Err(PostServiceError::PostNotFound { id });
        };

        if existing.user_id != updated.user_id {
            tracing::debug!(
                post_id = id,
                stored_user_id = existing.user_id,
                requested_user_id = updated.user_id,
                "Ignoring userId change on update"
            );
        }

        let saved = self
            .repository
            .save(&existing.with_content(updated.title, updated.body))
            .await?;

        tracing::debug!(post_id = id, "Updated post");

        Ok(Some(saved))
    }

    /// Delete a locally stored post. The external API is never consulted.
    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(PostServiceError::PostNotFound { id });
        }

        self.repository.delete_by_id(id).await?;

        tracing::debug!(post_id = id, "Deleted post");

        Ok(())
    }

    /// Distinct owners of locally stored posts
    pub async fn list_user_ids(&self) -> Result<BTreeSet<i64>, PostServiceError> {
        Ok(self.repository.list_distinct_user_ids().await?)
    }
}
