use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use myrun_core::{AppError, FieldErrors};
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
    /// Per-field messages when form validation failed.
    field_errors: Option<FieldErrors>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.0.to_string();
        let field_errors = match self.0 {
            AppError::InvalidFields(errors) => Some(errors),
            _ => None,
        };

        (
            status,
            Json(ErrorResponse {
                message,
                field_errors,
            }),
        )
            .into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
