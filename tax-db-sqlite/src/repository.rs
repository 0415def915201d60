use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tax_core::{NewTaxRecord, RepositoryError, TaxRecord, TaxRecordRepository};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal};

const SELECT_COLUMNS: &str = "SELECT id, municipality, rate, start_date, end_date FROM tax_record";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connect to `database_url`.
    ///
    /// Accepts a sqlx URL (`sqlite:taxes.db?mode=rwc`), a bare file path
    /// (created if missing) or `:memory:`. In-memory databases are held on a
    /// single long-lived connection so the data outlives idle periods.
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = matches!(database_url, ":memory:" | "sqlite::memory:");

        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)
                .with_context(|| format!("Invalid database URL: {}", database_url))?
        } else {
            SqliteConnectOptions::new()
                .filename(database_url)
                .create_if_missing(true)
        };

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_tax_record(row: &sqlx::sqlite::SqliteRow) -> Result<TaxRecord, RepositoryError> {
    Ok(TaxRecord {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        municipality: row
            .try_get("municipality")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        rate: get_decimal(row, "rate")?,
        start_date: row
            .try_get::<NaiveDate, _>("start_date")
            .map_err(|e| RepositoryError::Database(format!("Failed to get start_date: {}", e)))?,
        end_date: row
            .try_get::<NaiveDate, _>("end_date")
            .map_err(|e| RepositoryError::Database(format!("Failed to get end_date: {}", e)))?,
    })
}

#[async_trait]
impl TaxRecordRepository for SqliteRepository {
    async fn get_record(&self, id: i64) -> Result<TaxRecord, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        row_to_tax_record(&row)
    }

    async fn list_records(&self) -> Result<Vec<TaxRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_tax_record).collect()
    }

    // Dates are stored as ISO text, so the range comparison is only
    // chronological for four-digit years.
    async fn find_records(
        &self,
        municipality: &str,
        date: NaiveDate,
    ) -> Result<Vec<TaxRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS}
             WHERE municipality = ? AND start_date <= ? AND end_date >= ?
             ORDER BY id"
        ))
        .bind(municipality)
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_tax_record).collect()
    }

    async fn insert_record(&self, record: NewTaxRecord) -> Result<TaxRecord, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO tax_record (municipality, rate, start_date, end_date)
             VALUES (?, ?, ?, ?)
             RETURNING id, municipality, rate, start_date, end_date",
        )
        .bind(&record.municipality)
        .bind(decimal_to_text(record.rate))
        .bind(record.start_date)
        .bind(record.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let inserted = row_to_tax_record(&row)?;
        debug!(id = inserted.id, municipality = %inserted.municipality, "inserted tax record");
        Ok(inserted)
    }

    async fn update_record(&self, record: &TaxRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE tax_record SET
                municipality = ?, rate = ?, start_date = ?, end_date = ?
             WHERE id = ?",
        )
        .bind(&record.municipality)
        .bind(decimal_to_text(record.rate))
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            debug!(id = record.id, "update matched no tax record");
        }

        Ok(())
    }

    async fn delete_record(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tax_record WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            debug!(id, "delete matched no tax record");
        }

        Ok(())
    }
}
