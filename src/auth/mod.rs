use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod cookie;
mod dto;
pub mod extractors;
pub mod handlers;
mod password;
pub mod repo;
pub mod repo_types;
pub mod session;

pub use dto::MessageResponse;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
