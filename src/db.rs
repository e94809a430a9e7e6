use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

/// Connects to Postgres, retrying forever with a fixed delay between attempts.
pub async fn connect_with_retry(database_url: &str, delay: Duration) -> PgPool {
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "database connected");
                return pool;
            }
            Err(e) => {
                warn!(error = %e, attempt, retry_in = ?delay, "database connection failed");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(db).await?;
    Ok(())
}
