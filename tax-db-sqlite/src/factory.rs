use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use tax_core::db::repository::{RepositoryError, TaxRecordRepository};
use tax_core::db::{DbConfig, RepositoryFactory};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`tax_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use tax_core::db::RepositoryRegistry;
/// use tax_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory::new().with_seeds_dir("./seeds")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqliteRepositoryFactory {
    seeds_dir: Option<PathBuf>,
}

impl SqliteRepositoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute the `*.sql` files in `dir` after migrations on every `create`.
    pub fn with_seeds_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.seeds_dir = Some(dir.into());
        self
    }
}

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"taxes.db"`, created if it does not exist.
    /// * A sqlx URL, e.g. `"sqlite:taxes.db?mode=rwc"`.
    /// * `":memory:"`, an ephemeral in-memory database.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Arc<dyn TaxRecordRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        if let Some(dir) = &self.seeds_dir {
            info!(seeds = %dir.display(), "running seed files");
            repo.run_seeds(dir)
                .await
                .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        }
        Ok(Arc::new(repo))
    }
}
