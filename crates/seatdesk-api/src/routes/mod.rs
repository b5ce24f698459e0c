//! API Routes

pub mod health;
pub mod members;
pub mod plans;
pub mod billings;
pub mod floors;
pub mod seats;
pub mod attendance;
pub mod sms;
pub mod subadmins;

use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;
use crate::models::ApiResponse;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
pub type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// JSON request body whose rejections answer 400 in the API error envelope
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

pub(crate) fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

pub(crate) fn created<T>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}
