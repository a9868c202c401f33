//! SQLite post store implementation

use async_trait::async_trait;
use post_sync_domain::{Post, PostRepository, StoreError};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::collections::BTreeSet;
use std::path::Path;

type PostRow = (i64, i64, String, String);

/// SQLite-backed post store
pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    /// Open (or create) the database at `db_path` and apply the schema
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Database(format!("Failed to create directory: {}", e)))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        tracing::debug!(path = %db_path.display(), "Opened SQLite post store");

        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS post (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_post_user_id ON post(user_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

fn row_to_post((id, user_id, title, body): PostRow) -> Post {
    Post {
        id: Some(id),
        user_id,
        title,
        body,
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let row: Option<PostRow> =
            sqlx::query_as("SELECT id, user_id, title, body FROM post WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(row_to_post))
    }

    async fn save(&self, post: &Post) -> Result<Post, StoreError> {
        let row: PostRow = match post.id {
            Some(id) => sqlx::query_as(
                r#"
                INSERT INTO post (id, user_id, title, body)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    user_id = excluded.user_id,
                    title = excluded.title,
                    body = excluded.body
                RETURNING id, user_id, title, body
                "#,
            )
            .bind(id)
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.body)
            .fetch_one(&self.pool)
            .await,
            None => sqlx::query_as(
                r#"
                INSERT INTO post (user_id, title, body)
                VALUES (?, ?, ?)
                RETURNING id, user_id, title, body
                "#,
            )
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.body)
            .fetch_one(&self.pool)
            .await,
        }
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row_to_post(row))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM post WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_distinct_user_ids(&self) -> Result<BTreeSet<i64>, StoreError> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT DISTINCT user_id FROM post")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }
}
