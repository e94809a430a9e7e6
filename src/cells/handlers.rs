use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument};

use super::{dto::SaveCellRequest, repo_types::CellRecord};
use crate::{
    auth::MessageResponse,
    error::{ApiError, ApiJson, ApiResult},
    state::AppState,
};

pub fn cell_routes() -> Router<AppState> {
    Router::new()
        .route("/saveDynamicData", post(save_cell))
        .route("/getDynamicData", get(list_cells))
}

#[instrument(skip(state, body))]
pub async fn save_cell(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SaveCellRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if body.col_name.trim().is_empty() {
        return Err(ApiError::BadRequest("colName is required".into()));
    }
    let rec = state
        .cells
        .upsert(body.row_index, &body.col_name, &body.value)
        .await?;
    debug!(id = %rec.id, row_index = rec.row_index, col_name = %rec.col_name, "cell saved");
    Ok(Json(MessageResponse::new("Data saved successfully")))
}

#[instrument(skip(state))]
pub async fn list_cells(State(state): State<AppState>) -> ApiResult<Json<Vec<CellRecord>>> {
    Ok(Json(state.cells.list().await?))
}
