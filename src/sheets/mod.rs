use crate::state::AppState;
use axum::Router;

pub mod feed;
pub mod handlers;
pub mod mirror;
pub mod source;

pub fn router() -> Router<AppState> {
    handlers::sheet_routes()
}

pub fn live_router() -> Router<AppState> {
    handlers::live_routes()
}
