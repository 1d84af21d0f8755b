use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use drover_sdk::{DroverError, ErrorKind};

/// API-boundary error: every [`DroverError`] recovered into a structured
/// JSON response. Nothing below the boundary is allowed to crash a
/// request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Drover(#[from] DroverError),

    #[error("authentication required")]
    Unauthenticated,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, detail) = match &self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                self.to_string(),
            ),
            Self::Drover(error) => {
                let (status, kind) = match error.kind() {
                    ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
                    ErrorKind::Conflict => (StatusCode::CONFLICT, "conflict"),
                    ErrorKind::Referential => (StatusCode::BAD_REQUEST, "referential"),
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
                    ErrorKind::Transaction => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "transaction_failed")
                    }
                    ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
                };
                if status.is_server_error() {
                    tracing::error!(%error, "request failed");
                }
                (status, kind, error.to_string())
            }
        };

        let body = Json(json!({
            "error": kind,
            "detail": detail,
        }));
        (status, body).into_response()
    }
}

pub type ServerResult<T> = Result<T, ApiError>;
