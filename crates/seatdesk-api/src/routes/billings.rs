//! Billing and enrollment endpoints

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;
use seatdesk_core::application::dto::{EnrollCommand, Enrollment, PaymentInput, QuoteView};
use seatdesk_core::domain::value_objects::BillingId;
use seatdesk_core::ports::outbound::BillingFilter;
use seatdesk_core::{Billing, MemberKey, PlanId};
use serde::Deserialize;

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_billings).post(enroll))
        .route("/quote", post(quote))
        .route("/:id", get(get_billing))
        .route("/member/:member_id", get(member_billings))
}

#[derive(Deserialize)]
pub struct ListParams {
    member: Option<MemberKey>,
    plan: Option<PlanId>,
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    plan: PlanId,
    #[serde(flatten)]
    payment: PaymentInput,
}

pub async fn list_billings(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Billing>> {
    let filter = BillingFilter { member: params.member, plan: params.plan };
    ok(state.desk.enrollment.list_billings(&actor, filter).await?)
}

/// Create or renew a membership; the billing is the created resource
pub async fn enroll(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<EnrollCommand>,
) -> Created<Enrollment> {
    created(state.desk.enrollment.enroll(&actor, command).await?)
}

pub async fn quote(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(request): JsonBody<QuoteRequest>,
) -> ApiResult<QuoteView> {
    let quote = state.desk.enrollment.quote(&actor, &request.plan, &request.payment).await?;
    ok(QuoteView { plan: request.plan, quote })
}

pub async fn get_billing(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<BillingId>,
) -> ApiResult<Billing> {
    ok(state.desk.enrollment.get_billing(&actor, &id).await?)
}

pub async fn member_billings(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(member): Path<MemberKey>,
) -> ApiResult<Vec<Billing>> {
    ok(state.desk.enrollment.member_billings(&actor, &member).await?)
}
