use crate::state::AppState;
use axum::Router;

pub mod dashboard;
pub mod users;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::dashboard_routes())
        .merge(users::users_routes())
}
