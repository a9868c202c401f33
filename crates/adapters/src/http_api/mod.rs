//! REST transport for the post service
//!
//! Routes:
//! - `POST /posts` create, 201
//! - `GET /posts/:id` get, 200
//! - `PUT /posts` update, 200
//! - `DELETE /posts/:id` delete, 204
//! - `GET /health` liveness
//!
//! Not-found failures become 404, external and store failures 500, bad request
//! bodies 400.

mod error;

pub use error::ApiError;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use post_sync_domain::{
    Post,
    usecases::{DynPostService, PostServiceError},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

type SharedService = Arc<DynPostService>;

/// Build the application router
pub fn router(service: SharedService, request_timeout: Duration) -> Router {
    Router::new()
        .route("/posts", post(create_post).put(update_post))
        .route("/posts/:id", get(get_post).delete(delete_post))
        .route("/health", get(health))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn create_post(
    State(service): State<SharedService>,
    payload: Result<Json<Post>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(post) = payload?;
    let created = service.create(post).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_post(
    State(service): State<SharedService>,
    Path(id): Path<i64>,
) -> Result<Json<Post>, ApiError> {
    service
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError(PostServiceError::PostNotFound { id }))
}

async fn update_post(
    State(service): State<SharedService>,
    payload: Result<Json<Post>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let Json(post) = payload?;
    let id = post.id;
    match service.update(post).await? {
        Some(updated) => Ok(Json(updated)),
        None => Err(ApiError(PostServiceError::PostNotFound {
            id: id.unwrap_or_default(),
        })),
    }
}

async fn delete_post(
    State(service): State<SharedService>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
