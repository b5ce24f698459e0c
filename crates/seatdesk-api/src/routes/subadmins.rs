//! Subadmin account endpoints (admin only)

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use seatdesk_core::application::dto::RegisterSubadminCommand;
use seatdesk_core::UserAccount;

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_subadmins).post(register_subadmin))
}

pub async fn list_subadmins(State(state): State<AppState>, AuthActor(actor): AuthActor) -> ApiResult<Vec<UserAccount>> {
    ok(state.desk.accounts.list_subadmins(&actor).await?)
}

pub async fn register_subadmin(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<RegisterSubadminCommand>,
) -> Created<UserAccount> {
    created(state.desk.accounts.register_subadmin(&actor, command).await?)
}
