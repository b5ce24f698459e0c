//! Plan catalog endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use seatdesk_core::domain::aggregates::{NewPlan, PlanPatch};
use seatdesk_core::{Plan, PlanId};

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", get(get_plan).put(update_plan).delete(delete_plan))
        .route("/:id/enable", post(enable_plan))
        .route("/:id/disable", post(disable_plan))
}

pub async fn list_plans(State(state): State<AppState>, AuthActor(actor): AuthActor) -> ApiResult<Vec<Plan>> {
    ok(state.desk.plans.list_plans(&actor).await?)
}

pub async fn create_plan(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<NewPlan>,
) -> Created<Plan> {
    created(state.desk.plans.create_plan(&actor, command).await?)
}

pub async fn get_plan(State(state): State<AppState>, AuthActor(actor): AuthActor, Path(id): Path<PlanId>) -> ApiResult<Plan> {
    ok(state.desk.plans.get_plan(&actor, &id).await?)
}

pub async fn update_plan(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<PlanId>,
    JsonBody(patch): JsonBody<PlanPatch>,
) -> ApiResult<Plan> {
    ok(state.desk.plans.update_plan(&actor, &id, patch).await?)
}

pub async fn enable_plan(State(state): State<AppState>, AuthActor(actor): AuthActor, Path(id): Path<PlanId>) -> ApiResult<Plan> {
    ok(state.desk.plans.set_plan_enabled(&actor, &id, true).await?)
}

pub async fn disable_plan(State(state): State<AppState>, AuthActor(actor): AuthActor, Path(id): Path<PlanId>) -> ApiResult<Plan> {
    ok(state.desk.plans.set_plan_enabled(&actor, &id, false).await?)
}

pub async fn delete_plan(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<PlanId>,
) -> Result<StatusCode, ApiError> {
    state.desk.plans.delete_plan(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
