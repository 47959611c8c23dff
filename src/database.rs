use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::info;

use crate::error::SeismicError;

/// One persisted per-trace summary.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub dataset: String,
    pub filename: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub sampling_rate: f64,
}

/// SQLite-backed metadata catalog. Records are append-only: re-indexing
/// re-inserts rows, and range queries deduplicate filenames instead.
#[derive(Clone)]
pub struct MetadataStore {
    pool: SqlitePool,
}

impl MetadataStore {
    pub async fn new(database_path: &Path) -> Result<Self, SeismicError> {
        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(
            "Metadata store ready at {}",
            database_path.display()
        );
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), SeismicError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS files
                 (id INTEGER PRIMARY KEY AUTOINCREMENT,
                  dataset TEXT NOT NULL,
                  filename TEXT NOT NULL,
                  start_time TEXT NOT NULL,
                  end_time TEXT NOT NULL,
                  sampling_rate REAL NOT NULL)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_file_metadata(&self, record: &FileMetadata) -> Result<(), SeismicError> {
        sqlx::query(
            "INSERT INTO files (dataset, filename, start_time, end_time, sampling_rate)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.dataset)
        .bind(&record.filename)
        .bind(encode_timestamp(record.start_time))
        .bind(encode_timestamp(record.end_time))
        .bind(record.sampling_rate)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn dataset_time_range(
        &self,
        dataset: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, SeismicError> {
        let row = sqlx::query(
            "SELECT MIN(start_time) AS min_time, MAX(end_time) AS max_time
             FROM files WHERE dataset = ?",
        )
        .bind(dataset)
        .fetch_one(&self.pool)
        .await?;

        let min_time: Option<String> = row.get("min_time");
        let max_time: Option<String> = row.get("max_time");
        match (min_time, max_time) {
            (Some(lo), Some(hi)) => Ok(Some((decode_timestamp(&lo)?, decode_timestamp(&hi)?))),
            _ => Ok(None),
        }
    }

    /// Distinct filenames whose span overlaps `[start, end]`.
    pub async fn files_in_range(
        &self,
        dataset: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<String>, SeismicError> {
        let filenames = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT filename FROM files
             WHERE dataset = ? AND start_time <= ? AND end_time >= ?",
        )
        .bind(dataset)
        .bind(encode_timestamp(end))
        .bind(encode_timestamp(start))
        .fetch_all(&self.pool)
        .await?;
        Ok(filenames)
    }

    pub async fn has_records(&self, dataset: &str) -> Result<bool, SeismicError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files WHERE dataset = ?")
            .bind(dataset)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

// Fixed-width UTC encoding so that lexicographic string comparison in SQL
// matches chronological order.
fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, SeismicError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SeismicError::Internal {
            message: format!("invalid timestamp in metadata store: {}", e),
        })
}
