//! Floor endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use seatdesk_core::application::dto::{CreateFloorCommand, FloorWithSeats};
use seatdesk_core::domain::aggregates::FloorPatch;
use seatdesk_core::domain::value_objects::FloorId;
use seatdesk_core::Floor;

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_floors).post(create_floor))
        .route("/:id", get(get_floor).put(update_floor).delete(delete_floor))
}

pub async fn list_floors(State(state): State<AppState>, AuthActor(actor): AuthActor) -> ApiResult<Vec<FloorWithSeats>> {
    ok(state.desk.seating.list_floors(&actor).await?)
}

pub async fn create_floor(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<CreateFloorCommand>,
) -> Created<Floor> {
    created(state.desk.seating.create_floor(&actor, command).await?)
}

pub async fn get_floor(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<FloorId>,
) -> ApiResult<FloorWithSeats> {
    ok(state.desk.seating.get_floor(&actor, &id).await?)
}

pub async fn update_floor(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<FloorId>,
    JsonBody(patch): JsonBody<FloorPatch>,
) -> ApiResult<Floor> {
    ok(state.desk.seating.update_floor(&actor, &id, patch).await?)
}

/// 409 while the floor still has seats
pub async fn delete_floor(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<FloorId>,
) -> Result<StatusCode, ApiError> {
    state.desk.seating.delete_floor(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
