use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};

use super::ImageStore;
use crate::{error::Result, model::ImageRecord};

/// Column list for `images` queries
const IMAGE_COLUMNS: &str = "id, filename, url, created_at";

/// `SQLite`-backed record store
#[derive(Clone)]
pub struct SqliteImageStore {
    pool: SqlitePool,
}

impl SqliteImageStore {
    /// Open (creating when missing) the database and run pending migrations
    pub async fn connect(config: &picto_config::StorageConfig) -> Result<Self> {
        let in_memory = config.database_url.contains(":memory:");

        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // Every connection to `:memory:` is its own database
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running pending migrations on it
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!("image store migrations applied");

        Ok(Self { pool })
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ImageStore for SqliteImageStore {
    async fn create(&self, filename: &str, url: &str) -> Result<ImageRecord> {
        let query = format!(
            "INSERT INTO images (filename, url, created_at)
             VALUES ($1, $2, $3)
             RETURNING {IMAGE_COLUMNS}"
        );

        let record = sqlx::query_as::<_, ImageRecord>(&query)
            .bind(filename)
            .bind(url)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id = record.id, filename = %record.filename, "image record created");

        Ok(record)
    }
}
