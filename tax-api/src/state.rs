use std::sync::Arc;

use tax_core::TaxRecordRepository;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TaxRecordRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TaxRecordRepository>) -> Self {
        Self { repo }
    }
}
