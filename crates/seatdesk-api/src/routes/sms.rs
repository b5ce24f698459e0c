//! SMS endpoints

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use seatdesk_core::application::dto::{CreateTemplateCommand, SendSmsCommand};
use seatdesk_core::{SmsRecord, SmsTemplate};

use super::{created, ok, ApiResult, Created, JsonBody};
use crate::auth::AuthActor;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route("/send", post(send_bulk))
        .route("/history", get(sms_history))
}

pub async fn list_templates(State(state): State<AppState>, AuthActor(actor): AuthActor) -> ApiResult<Vec<SmsTemplate>> {
    ok(state.desk.messaging.list_templates(&actor).await?)
}

pub async fn create_template(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<CreateTemplateCommand>,
) -> Created<SmsTemplate> {
    created(state.desk.messaging.create_template(&actor, command).await?)
}

/// Delivery problems are logged server side; the send is recorded regardless
pub async fn send_bulk(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    JsonBody(command): JsonBody<SendSmsCommand>,
) -> Created<SmsRecord> {
    created(state.desk.messaging.send_bulk(&actor, command).await?)
}

pub async fn sms_history(State(state): State<AppState>, AuthActor(actor): AuthActor) -> ApiResult<Vec<SmsRecord>> {
    ok(state.desk.messaging.sms_history(&actor).await?)
}
