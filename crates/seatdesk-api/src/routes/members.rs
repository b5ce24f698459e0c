//! Member endpoints

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;
use seatdesk_core::application::dto::{
    AddMemberCommand, FreezeCommand, MemberAdded, MemberCategory, UnfreezeResult,
};
use seatdesk_core::domain::aggregates::MemberProfilePatch;
use seatdesk_core::{Member, MemberKey};
use serde::Deserialize;

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::models::{ExpiredCount, NextMemberId};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(add_member))
        .route("/next-id", get(next_member_id))
        .route("/search", get(search_members))
        .route("/expire", post(mark_expired))
        .route("/:id", get(get_member).put(update_member))
        .route("/:id/block", post(block_member))
        .route("/:id/unblock", post(unblock_member))
        .route("/:id/freeze", post(freeze_member))
        .route("/:id/unfreeze", post(unfreeze_member))
        .route("/:id/left", post(mark_left))
}

#[derive(Deserialize)]
pub struct ListParams {
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    q: String,
}

pub async fn list_members(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Member>> {
    let category = params
        .category
        .as_deref()
        .unwrap_or_default()
        .parse::<MemberCategory>()
        .map_err(ApiError::BadRequest)?;
    ok(state.desk.members.list_members(&actor, category).await?)
}

pub async fn add_member(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<AddMemberCommand>,
) -> Created<MemberAdded> {
    created(state.desk.members.add_member(&actor, command).await?)
}

pub async fn next_member_id(State(state): State<AppState>, AuthActor(actor): AuthActor) -> ApiResult<NextMemberId> {
    let id = state.desk.members.next_member_id(&actor).await?;
    ok(NextMemberId { member_id: id.to_string() })
}

pub async fn search_members(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Member>> {
    ok(state.desk.members.search_members(&actor, &params.q).await?)
}

pub async fn mark_expired(State(state): State<AppState>, AuthActor(actor): AuthActor) -> ApiResult<ExpiredCount> {
    let expired = state.desk.members.mark_expired(&actor).await?;
    ok(ExpiredCount { expired })
}

pub async fn get_member(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(key): Path<MemberKey>,
) -> ApiResult<Member> {
    ok(state.desk.members.get_member(&actor, &key).await?)
}

pub async fn update_member(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(key): Path<MemberKey>,
    JsonBody(patch): JsonBody<MemberProfilePatch>,
) -> ApiResult<Member> {
    ok(state.desk.members.update_member(&actor, &key, patch).await?)
}

pub async fn block_member(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(key): Path<MemberKey>,
) -> ApiResult<Member> {
    ok(state.desk.members.block_member(&actor, &key).await?)
}

pub async fn unblock_member(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(key): Path<MemberKey>,
) -> ApiResult<Member> {
    ok(state.desk.members.unblock_member(&actor, &key).await?)
}

pub async fn mark_left(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(key): Path<MemberKey>,
) -> ApiResult<Member> {
    ok(state.desk.members.mark_left(&actor, &key).await?)
}

pub async fn freeze_member(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(key): Path<MemberKey>,
    JsonBody(command): JsonBody<FreezeCommand>,
) -> ApiResult<Member> {
    ok(state.desk.members.freeze_member(&actor, &key, command).await?)
}

pub async fn unfreeze_member(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(key): Path<MemberKey>,
) -> ApiResult<UnfreezeResult> {
    ok(state.desk.members.unfreeze_member(&actor, &key).await?)
}
