use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One `(row_index, col_name)` cell written through the dynamic-data API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub id: Uuid,
    pub row_index: i64,
    pub col_name: String,
    pub value: String,
}
