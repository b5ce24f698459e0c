//! HTTP error mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use seatdesk_core::UseCaseError;

use crate::auth::AuthError;
use crate::models::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    UseCase(#[from] UseCaseError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::UseCase(e) => match e {
                UseCaseError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                UseCaseError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
                UseCaseError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                UseCaseError::IllegalState(_) => (StatusCode::UNPROCESSABLE_ENTITY, "illegal_state"),
                UseCaseError::PartialFailure { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "partial_failure"),
                UseCaseError::EnrollmentIncomplete { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "enrollment_incomplete")
                }
                UseCaseError::Unauthorized(_) => (StatusCode::FORBIDDEN, "forbidden"),
                UseCaseError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
            ApiError::Auth(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }
        let message = match &self {
            // Store details stay in the log
            ApiError::UseCase(UseCaseError::Repository(_)) => "internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}
