/// Failure modes shared by the Postgres-backed repositories.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate value for unique field `{0}`")]
    Conflict(&'static str),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::Conflict(unique_field(db.constraint()));
            }
        }
        StoreError::Database(e)
    }
}

fn unique_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("email") => "email",
        Some(c) if c.contains("row_index") || c.contains("cell") => "row_index,col_name",
        _ => "unknown",
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
