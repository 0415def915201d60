use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{NewTaxRecord, TaxRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Persistence contract for [`TaxRecord`]s.
///
/// Every listing method returns records in ascending id order. The rate
/// resolver relies on this to break ties between equally wide windows.
#[async_trait]
pub trait TaxRecordRepository: Send + Sync {
    /// Fetch one record. Absence is [`RepositoryError::NotFound`].
    async fn get_record(&self, id: i64) -> Result<TaxRecord, RepositoryError>;

    async fn list_records(&self) -> Result<Vec<TaxRecord>, RepositoryError>;

    /// Records for exactly `municipality` (case-sensitive) whose window
    /// covers `date`. An empty vec when nothing matches.
    async fn find_records(
        &self,
        municipality: &str,
        date: NaiveDate,
    ) -> Result<Vec<TaxRecord>, RepositoryError>;

    /// Store a new record and return it with its assigned id.
    async fn insert_record(&self, record: NewTaxRecord) -> Result<TaxRecord, RepositoryError>;

    /// Replace every field of the record with the same id.
    /// Does nothing when no such record exists.
    async fn update_record(&self, record: &TaxRecord) -> Result<(), RepositoryError>;

    /// Remove the record if present. Does nothing otherwise.
    async fn delete_record(&self, id: i64) -> Result<(), RepositoryError>;
}
