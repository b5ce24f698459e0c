//! Seat endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use seatdesk_core::application::dto::{BulkSeatsCommand, BulkSeatsReport};
use seatdesk_core::domain::value_objects::{FloorId, SeatId};
use seatdesk_core::{MemberId, Seat};
use serde::Deserialize;

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_seats))
        .route("/bulk", post(create_seats))
        .route("/floor/:floor_id", get(seats_by_floor))
        .route("/:id", get(get_seat).delete(delete_seat))
        .route("/:id/assign", post(assign_seat))
        .route("/:id/unassign", post(unassign_seat))
}

#[derive(Deserialize)]
pub struct ListParams {
    floor: Option<FloorId>,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    member_id: MemberId,
}

pub async fn list_seats(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Seat>> {
    ok(state.desk.seating.list_seats(&actor, params.floor).await?)
}

pub async fn create_seats(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<BulkSeatsCommand>,
) -> Created<BulkSeatsReport> {
    created(state.desk.seating.create_seats(&actor, command).await?)
}

pub async fn seats_by_floor(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(floor): Path<FloorId>,
) -> ApiResult<Vec<Seat>> {
    ok(state.desk.seating.seats_by_floor(&actor, &floor).await?)
}

pub async fn get_seat(State(state): State<AppState>, AuthActor(actor): AuthActor, Path(id): Path<SeatId>) -> ApiResult<Seat> {
    ok(state.desk.seating.get_seat(&actor, &id).await?)
}

pub async fn delete_seat(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<SeatId>,
) -> Result<StatusCode, ApiError> {
    state.desk.seating.delete_seat(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 409 when another member won the seat first
pub async fn assign_seat(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<SeatId>,
    JsonBody(request): JsonBody<AssignRequest>,
) -> ApiResult<Seat> {
    ok(state.desk.seating.assign_seat(&actor, &id, &request.member_id).await?)
}

pub async fn unassign_seat(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<SeatId>,
) -> ApiResult<Seat> {
    ok(state.desk.seating.unassign_seat(&actor, &id).await?)
}
