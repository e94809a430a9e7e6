use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{auth::repo_types::User, error::ApiResult, state::AppState};

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

/// Every registered user, password hashes omitted.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list_all().await?))
}
