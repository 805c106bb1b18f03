use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use site_common::error::CommonError;
use site_common::site_api::ErrorResponse;
use tracing::error;

pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Common(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Client errors keep their message; server errors are logged and answered
/// with a fixed message so paths, SQL and row data never reach the caller.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let status_message = if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse {
            status_code: status.as_u16(),
            status_message,
        };
        (status, Json(body)).into_response()
    }
}
