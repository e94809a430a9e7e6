use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCellRequest {
    pub row_index: i64,
    pub col_name: String,
    pub value: String,
}
