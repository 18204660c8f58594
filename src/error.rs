use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

/// Body sent with every failed request.
pub const INTERNAL_ERROR_BODY: &str = "internal-server-error";

/// Handler failure.
///
/// Every kind is answered with the same 500 response; the kind only decides
/// how loudly it is logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("user not found")]
    NotFound,
    #[error("invalid user id {0:?}")]
    InvalidId(String),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("database error: {0}")]
    Storage(#[source] sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(_) => error!(error = %self, "request failed"),
            _ => warn!(error = %self, "request failed"),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
    }
}
