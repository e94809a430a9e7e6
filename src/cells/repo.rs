use async_trait::async_trait;
use sqlx::PgPool;

use crate::cells::repo_types::CellRecord;
use crate::store::StoreResult;

#[async_trait]
pub trait CellRepo: Send + Sync {
    /// Overwrites the value stored at `(row_index, col_name)` or creates it.
    async fn upsert(&self, row_index: i64, col_name: &str, value: &str) -> StoreResult<CellRecord>;
    /// All records in the store's natural order.
    async fn list(&self) -> StoreResult<Vec<CellRecord>>;
}

#[derive(Clone)]
pub struct PgCellRepo {
    db: PgPool,
}

impl PgCellRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CellRepo for PgCellRepo {
    async fn upsert(&self, row_index: i64, col_name: &str, value: &str) -> StoreResult<CellRecord> {
        // Single statement against the (row_index, col_name) unique key, so two
        // writers of the same cell cannot both insert.
        let rec = sqlx::query_as::<_, CellRecord>(
            r#"
            INSERT INTO dynamic_data (row_index, col_name, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (row_index, col_name)
            DO UPDATE SET value = EXCLUDED.value
            RETURNING id, row_index, col_name, value
            "#,
        )
        .bind(row_index)
        .bind(col_name)
        .bind(value)
        .fetch_one(&self.db)
        .await?;
        Ok(rec)
    }

    async fn list(&self) -> StoreResult<Vec<CellRecord>> {
        let rows = sqlx::query_as::<_, CellRecord>(
            r#"
            SELECT id, row_index, col_name, value
            FROM dynamic_data
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    pub struct MemoryCellRepo {
        cells: Mutex<Vec<CellRecord>>,
    }

    #[async_trait]
    impl CellRepo for MemoryCellRepo {
        async fn upsert(
            &self,
            row_index: i64,
            col_name: &str,
            value: &str,
        ) -> StoreResult<CellRecord> {
            let mut cells = self.cells.lock().await;
            if let Some(rec) = cells
                .iter_mut()
                .find(|c| c.row_index == row_index && c.col_name == col_name)
            {
                rec.value = value.to_string();
                return Ok(rec.clone());
            }
            let rec = CellRecord {
                id: Uuid::new_v4(),
                row_index,
                col_name: col_name.to_string(),
                value: value.to_string(),
            };
            cells.push(rec.clone());
            Ok(rec)
        }

        async fn list(&self) -> StoreResult<Vec<CellRecord>> {
            Ok(self.cells.lock().await.clone())
        }
    }

    #[tokio::test]
    async fn repeated_upsert_keeps_one_record_with_latest_value() {
        let repo = MemoryCellRepo::default();
        let first = repo.upsert(3, "Status", "open").await.unwrap();
        let second = repo.upsert(3, "Status", "closed").await.unwrap();
        assert_eq!(first.id, second.id);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, "closed");
    }

    #[tokio::test]
    async fn distinct_keys_are_distinct_records() {
        let repo = MemoryCellRepo::default();
        repo.upsert(1, "A", "x").await.unwrap();
        repo.upsert(1, "B", "y").await.unwrap();
        repo.upsert(2, "A", "z").await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }
}
