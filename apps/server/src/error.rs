use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use goldquote_core::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Gold price data not available")]
    CacheUnavailable,
    #[error("{0}")]
    UpdateFailed(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ApiError::CacheUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                self.to_string(),
                "Service is initializing, please try again in a moment".to_string(),
            ),
            ApiError::UpdateFailed(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update gold price".to_string(),
                reason.clone(),
            ),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }
        let body = Json(ErrorBody {
            success: false,
            error,
            message,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CacheUnavailable => ApiError::CacheUnavailable,
        }
    }
}
