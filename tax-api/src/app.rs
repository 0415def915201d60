use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tax_core::TaxRecordRepository;
use tax_core::db::{DbConfig, MemoryRepositoryFactory, RepositoryRegistry};
use tax_db_sqlite::SqliteRepositoryFactory;
use tracing::info;

/// Registry with every backend this binary ships.
pub fn build_registry(seeds: Option<&Path>) -> RepositoryRegistry {
    let sqlite = match seeds {
        Some(dir) => SqliteRepositoryFactory::new().with_seeds_dir(dir),
        None => SqliteRepositoryFactory::new(),
    };

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(MemoryRepositoryFactory));
    registry.register(Box::new(sqlite));
    registry
}

/// Open the configured record store.
pub async fn open_repository(
    config: &DbConfig,
    seeds: Option<&Path>,
) -> Result<Arc<dyn TaxRecordRepository>> {
    let registry = build_registry(seeds);
    let repo = registry
        .create(config)
        .await
        .with_context(|| format!("Failed to open {} store at {}", config.backend, config.connection_string))?;
    info!(backend = %config.backend, "record store ready");
    Ok(repo)
}
