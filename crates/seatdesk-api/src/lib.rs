//! SeatDesk HTTP API
//!
//! Thin axum adapter over `seatdesk-core`: every handler authenticates the
//! caller, hands the resulting actor to a use case and wraps the outcome in
//! the [`ApiResponse`] envelope.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Bearer JWT ─► AuthActor ─► handler ─► SeatDesk use cases  │
//! │                                │                           │
//! │                UseCaseError ─► ApiError ─► HTTP status     │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use axum::{routing::get, Router};
use seatdesk_core::SeatDesk;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use auth::{AuthActor, JwtAuth};
pub use config::Config;
pub use error::ApiError;
pub use models::*;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub desk: SeatDesk,
    pub auth: Arc<JwtAuth>,
}

impl AppState {
    pub fn new(desk: SeatDesk, auth: JwtAuth) -> Self {
        Self { desk, auth: Arc::new(auth) }
    }
}

/// Build the API router
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let cors = if cors_permissive { CorsLayer::permissive() } else { CorsLayer::new() };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/members", routes::members::router())
        .nest("/plans", routes::plans::router())
        .nest("/billings", routes::billings::router())
        .nest("/floors", routes::floors::router())
        .nest("/seats", routes::seats::router())
        .nest("/attendances", routes::attendance::router())
        .nest("/sms", routes::sms::router())
        .nest("/subadmins", routes::subadmins::router())
}
