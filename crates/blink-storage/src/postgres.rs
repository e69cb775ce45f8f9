use crate::error::{is_unique_violation, map_migrate_error, map_sqlx_error};
use async_trait::async_trait;
use blink_core::error::StorageResult as Result;
use blink_core::{ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use jiff::Timestamp;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL implementation of the repository contract.
///
/// The `short_urls` primary key is the source of truth for collisions:
/// inserts are attempted blindly and a unique violation is reported as
/// [`StorageError::Conflict`]. Hits are counted with a single
/// `UPDATE ... RETURNING` statement so concurrent redirects from any number
/// of service instances never lose an increment.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Creates a repository from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(map_migrate_error)?;
        info!("postgres schema is up to date");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_hits(raw: i64) -> Result<u64> {
    u64::try_from(raw)
        .map_err(|_| StorageError::InvalidData(format!("negative hit count: {raw}")))
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn record_from_row(row: &PgRow) -> Result<UrlRecord> {
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let hits: i64 = row.try_get("hits").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        original_url,
        hits: parse_hits(hits)?,
        created_at: parse_created_at(created_at)?,
    })
}

#[async_trait]
impl ReadRepository for PgRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT original_url, hits, created_at
            FROM short_urls
            WHERE short_code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn hits(&self, code: &ShortCode) -> Result<Option<u64>> {
        let hits: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT hits
            FROM short_urls
            WHERE short_code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        hits.map(parse_hits).transpose()
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let hits = i64::try_from(record.hits).map_err(|_| {
            StorageError::InvalidData(format!("hit count overflow: {}", record.hits))
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, original_url, hits, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(code.as_str())
        .bind(record.original_url)
        .bind(hits)
        .bind(record.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn record_hit(&self, code: &ShortCode) -> Result<Option<String>> {
        sqlx::query_scalar(
            r#"
            UPDATE short_urls
            SET hits = hits + 1
            WHERE short_code = $1
            RETURNING original_url
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}
