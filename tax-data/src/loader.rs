use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::models::calendar_date;
use tax_core::{NewTaxRecord, RepositoryError, TaxRecordRepository};
use thiserror::Error;

/// Errors that can occur when loading tax record data.
#[derive(Debug, Error)]
pub enum TaxRecordLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Row {row}: start_date {start} is after end_date {end}")]
    InvertedWindow {
        row: usize,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Row {0}: municipality is empty")]
    EmptyMunicipality(usize),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for TaxRecordLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxRecordLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a tax rates CSV file.
///
/// - `municipality`: jurisdiction name, matched case-sensitively at query time
/// - `rate`: decimal fraction (e.g., 0.25 for 25%)
/// - `start_date`, `end_date`: inclusive validity window, `YYYY-MM-DD`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxRecordRow {
    pub municipality: String,
    pub rate: Decimal,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
}

impl From<&TaxRecordRow> for NewTaxRecord {
    fn from(row: &TaxRecordRow) -> Self {
        NewTaxRecord {
            municipality: row.municipality.trim().to_string(),
            rate: row.rate,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

/// Loader for tax records from CSV files.
///
/// Works against any [`TaxRecordRepository`], so the same file can seed the
/// SQLite store or an in-memory one.
pub struct TaxRecordLoader;

impl TaxRecordLoader {
    /// Parse tax record rows from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxRecordRow>, TaxRecordLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = Vec::new();

        for result in csv_reader.deserialize() {
            let row: TaxRecordRow = result?;
            rows.push(row);
        }

        Ok(rows)
    }

    /// Check every row before anything is written. Row numbers are 1-based
    /// and do not count the header.
    pub fn validate(rows: &[TaxRecordRow]) -> Result<(), TaxRecordLoaderError> {
        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;
            if row.municipality.trim().is_empty() {
                return Err(TaxRecordLoaderError::EmptyMunicipality(row_number));
            }
            if row.start_date > row.end_date {
                return Err(TaxRecordLoaderError::InvertedWindow {
                    row: row_number,
                    start: row.start_date,
                    end: row.end_date,
                });
            }
        }
        Ok(())
    }

    /// Validate and insert every row, returning how many were inserted.
    ///
    /// Nothing is inserted when any row is invalid. Rows are appended, never
    /// merged with existing records: overlapping windows are legitimate.
    pub async fn load<R: TaxRecordRepository + ?Sized>(
        repo: &R,
        rows: &[TaxRecordRow],
    ) -> Result<usize, TaxRecordLoaderError> {
        Self::validate(rows)?;

        let mut inserted = 0;
        for row in rows {
            repo.insert_record(row.into()).await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}
