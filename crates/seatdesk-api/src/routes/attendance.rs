//! Attendance endpoints

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use seatdesk_core::application::dto::MarkAttendanceCommand;
use seatdesk_core::{Attendance, MemberKey};
use serde::Deserialize;

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(attendance_history).post(mark_attendance))
}

#[derive(Deserialize)]
pub struct HistoryParams {
    member: MemberKey,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<MarkAttendanceCommand>,
) -> Created<Attendance> {
    created(state.desk.attendance.mark_attendance(&actor, command).await?)
}

pub async fn attendance_history(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Vec<Attendance>> {
    ok(state
        .desk
        .attendance
        .attendance_history(&actor, &params.member, params.from, params.to)
        .await?)
}
