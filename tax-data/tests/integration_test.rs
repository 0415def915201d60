//! Integration tests for tax record loading using the SQLite backend.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::TaxRecordRepository;
use tax_core::calculations::applicable_rate;
use tax_data::{TaxRecordLoader, TaxRecordLoaderError};
use tax_db_sqlite::SqliteRepository;

const TEST_CSV: &str = include_str!("../test-data/tax_records.csv");

async fn setup_test_db() -> SqliteRepository {
    let repo = SqliteRepository::new(":memory:")
        .await
        .expect("Failed to create in-memory database");
    repo.run_migrations()
        .await
        .expect("Failed to run migrations");
    repo
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_load_all_rows() {
    let repo = setup_test_db().await;

    let rows = TaxRecordLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");
    let inserted = TaxRecordLoader::load(&repo, &rows)
        .await
        .expect("Failed to load records");

    assert_eq!(inserted, 10);
    assert_eq!(repo.list_records().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_loaded_records_resolve_narrowest_rate() {
    let repo = setup_test_db().await;
    let rows = TaxRecordLoader::parse(TEST_CSV.as_bytes()).unwrap();
    TaxRecordLoader::load(&repo, &rows).await.unwrap();

    let cases = [
        (date(2016, 1, 1), dec!(0.1)),
        (date(2016, 5, 2), dec!(0.4)),
        (date(2016, 7, 10), dec!(0.2)),
        (date(2016, 3, 16), dec!(0.2)),
        (date(2016, 12, 25), dec!(0.1)),
    ];

    for (day, expected) in cases {
        let candidates = repo.find_records("Vilnius", day).await.unwrap();
        assert_eq!(applicable_rate(&candidates), Ok(expected), "rate on {day}");
    }
}

#[tokio::test]
async fn test_loading_twice_appends() {
    let repo = setup_test_db().await;
    let rows = TaxRecordLoader::parse(TEST_CSV.as_bytes()).unwrap();

    TaxRecordLoader::load(&repo, &rows).await.unwrap();
    TaxRecordLoader::load(&repo, &rows).await.unwrap();

    assert_eq!(repo.list_records().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_invalid_file_leaves_database_untouched() {
    let repo = setup_test_db().await;
    let csv = "municipality,rate,start_date,end_date
Aarhus,0.25,2025-01-01,2025-12-31
Aarhus,0.30,2025-12-31,2025-01-01";
    let rows = TaxRecordLoader::parse(csv.as_bytes()).unwrap();

    let result = TaxRecordLoader::load(&repo, &rows).await;

    assert!(matches!(
        result,
        Err(TaxRecordLoaderError::InvertedWindow { row: 2, .. })
    ));
    assert!(repo.list_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repository_fault_is_reported() {
    let repo = setup_test_db().await;
    sqlx::query("DROP TABLE tax_record")
        .execute(repo.pool())
        .await
        .unwrap();
    let rows = TaxRecordLoader::parse(TEST_CSV.as_bytes()).unwrap();

    let result = TaxRecordLoader::load(&repo, &rows).await;

    assert!(matches!(result, Err(TaxRecordLoaderError::Repository(_))));
}
