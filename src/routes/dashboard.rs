use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::{claims::Claims, extractors::AuthUser, MessageResponse},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub message: String,
    pub user: Claims,
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/protected", get(protected))
}

#[instrument]
pub async fn dashboard(AuthUser(claims): AuthUser) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        message: "Welcome to the Dashboard".into(),
        user: claims,
    })
}

#[instrument]
pub async fn protected(AuthUser(claims): AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!("Welcome, user ID: {}", claims.sub)))
}
