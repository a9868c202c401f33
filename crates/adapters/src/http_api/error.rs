//! Mapping of service failures onto HTTP responses

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use post_sync_domain::usecases::{ErrorKind, PostServiceError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned by the post handlers
#[derive(Debug)]
pub struct ApiError(pub PostServiceError);

impl From<PostServiceError> for ApiError {
    fn from(value: PostServiceError) -> Self {
        ApiError(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(PostServiceError::InvalidInput(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::ExternalFailure | ErrorKind::StoreFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            match std::error::Error::source(&self.0) {
                Some(cause) => {
                    tracing::error!(error = %self.0, cause = %cause, "Request failed")
                }
                None => tracing::error!(error = %self.0, "Request failed"),
            }
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
