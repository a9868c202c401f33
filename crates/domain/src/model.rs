//! Domain models and value objects

use serde::{Deserialize, Serialize};

/// A user-authored post
///
/// The local store is authoritative for any post it holds. Posts fetched from
/// the external API are written through on first retrieval and are local from
/// then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned identifier, absent until the first save
    #[serde(default)]
    pub id: Option<i64>,
    /// Owning user, fixed at creation
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Create a post that has not been persisted yet
    pub fn new(user_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Same post with a known identifier
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Replace the mutable content, leaving `id` and `user_id` untouched
    pub fn with_content(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.title = title.into();
        self.body = body.into();
        self
    }
}

/// A user as returned by the external API, only used to test existence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}
