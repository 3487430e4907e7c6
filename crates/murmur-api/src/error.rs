use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use murmur_types::ChatError;
use murmur_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// The `Authorization` header is absent or unparseable.
    #[error("{0}")]
    AuthHeader(&'static str),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthHeader(_) => StatusCode::UNAUTHORIZED,
            Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Chat(e) => match e {
                ChatError::Unauthorized => StatusCode::UNAUTHORIZED,
                ChatError::NotFound
                | ChatError::RecipientNotFound
                | ChatError::ChatNotFound
                | ChatError::NoCorrespondents => StatusCode::NOT_FOUND,
                ChatError::AlreadyExists => StatusCode::CONFLICT,
                ChatError::OutOfRange => StatusCode::BAD_REQUEST,
                ChatError::Internal(_) | ChatError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("request failed: {}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Run a synchronous service call on the blocking pool.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> murmur_types::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
