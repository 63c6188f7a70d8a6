// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- App Error
/// 요청 처리 중 발생하는 오류
/// 각 오류 종류는 정확히 하나의 HTTP 상태 코드로 매핑된다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid or missing fields")]
    Validation { details: Vec<&'static str> },
    #[error("Unauthorized !")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Payload too large !")]
    PayloadTooLarge,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(details: &[&'static str]) -> Self {
        AppError::Validation {
            details: details.to_vec(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 오류 응답 변환
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Validation { details } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            AppError::Database(_) | AppError::Internal(_) => {
                // 원인은 서버 로그에만 남긴다
                error!("{:<12} --> 내부 오류: {}", "Error", self);
                json!({ "error": "Internal Server Error !" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

// endregion: --- App Error

// endregion: --- Tests
