//! Process-local record store.
//!
//! Records live in a `BTreeMap` keyed by id, so enumeration is always in
//! ascending id order. Nothing is persisted across restarts.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{RepositoryError, TaxRecordRepository};
use crate::models::{NewTaxRecord, TaxRecord};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, TaxRecord>,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: RwLock<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaxRecordRepository for MemoryRepository {
    async fn get_record(&self, id: i64) -> Result<TaxRecord, RepositoryError> {
        self.inner
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_records(&self) -> Result<Vec<TaxRecord>, RepositoryError> {
        Ok(self.inner.read().await.records.values().cloned().collect())
    }

    async fn find_records(
        &self,
        municipality: &str,
        date: NaiveDate,
    ) -> Result<Vec<TaxRecord>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .records
            .values()
            .filter(|r| r.municipality == municipality && r.covers(date))
            .cloned()
            .collect())
    }

    async fn insert_record(&self, record: NewTaxRecord) -> Result<TaxRecord, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let record = record.with_id(inner.next_id);
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_record(&self, record: &TaxRecord) -> Result<(), RepositoryError> {
        if let Some(existing) = self.inner.write().await.records.get_mut(&record.id) {
            *existing = record.clone();
        }
        Ok(())
    }

    async fn delete_record(&self, id: i64) -> Result<(), RepositoryError> {
        self.inner.write().await.records.remove(&id);
        Ok(())
    }
}

/// [`RepositoryFactory`] for the `"memory"` backend. The connection string
/// is ignored; every call yields a fresh, empty store.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Arc<dyn TaxRecordRepository>, RepositoryError> {
        Ok(Arc::new(MemoryRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_record(municipality: &str, start: NaiveDate, end: NaiveDate) -> NewTaxRecord {
        NewTaxRecord {
            municipality: municipality.to_string(),
            rate: dec!(0.2),
            start_date: start,
            end_date: end,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let repo = MemoryRepository::new();

        let first = repo
            .insert_record(new_record("Copenhagen", date(2024, 1, 1), date(2024, 12, 31)))
            .await
            .expect("Should insert");
        let second = repo
            .insert_record(new_record("Copenhagen", date(2024, 1, 1), date(2024, 1, 1)))
            .await
            .expect("Should insert");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemoryRepository::new();
        let first = repo
            .insert_record(new_record("Aarhus", date(2025, 1, 1), date(2025, 12, 31)))
            .await
            .unwrap();

        repo.delete_record(first.id).await.unwrap();
        let second = repo
            .insert_record(new_record("Aarhus", date(2025, 1, 1), date(2025, 12, 31)))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn get_record_not_found() {
        let repo = MemoryRepository::new();

        assert_eq!(repo.get_record(999).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn find_records_matches_municipality_exactly_and_covers_date() {
        let repo = MemoryRepository::new();
        repo.insert_record(new_record("Copenhagen", date(2024, 1, 1), date(2024, 12, 31)))
            .await
            .unwrap();
        repo.insert_record(new_record("Copenhagen", date(2024, 1, 1), date(2024, 1, 1)))
            .await
            .unwrap();
        repo.insert_record(new_record("copenhagen", date(2024, 1, 1), date(2024, 12, 31)))
            .await
            .unwrap();
        repo.insert_record(new_record("Copenhagen", date(2025, 1, 1), date(2025, 12, 31)))
            .await
            .unwrap();

        let found = repo
            .find_records("Copenhagen", date(2024, 1, 1))
            .await
            .expect("Should find records");

        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn find_records_empty_when_nothing_matches() {
        let repo = MemoryRepository::new();

        let found = repo.find_records("Oslo", date(2024, 1, 1)).await.unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let repo = MemoryRepository::new();
        let mut record = repo
            .insert_record(new_record("Copenhagen", date(2024, 1, 1), date(2024, 12, 31)))
            .await
            .unwrap();

        record.municipality = "Aalborg".to_string();
        record.rate = dec!(0.31);
        record.end_date = date(2024, 6, 30);
        repo.update_record(&record).await.expect("Should update");

        assert_eq!(repo.get_record(record.id).await, Ok(record));
    }

    #[tokio::test]
    async fn update_missing_record_is_a_no_op() {
        let repo = MemoryRepository::new();
        let ghost = new_record("Nowhere", date(2024, 1, 1), date(2024, 1, 2)).with_id(77);

        repo.update_record(&ghost).await.expect("Should not fail");

        assert!(repo.list_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_record_is_a_no_op() {
        let repo = MemoryRepository::new();

        repo.delete_record(123).await.expect("Should not fail");
    }

    #[tokio::test]
    async fn factory_creates_empty_store() {
        let repo = MemoryRepositoryFactory
            .create(&DbConfig::default())
            .await
            .expect("Should create");

        assert!(repo.list_records().await.unwrap().is_empty());
    }
}
