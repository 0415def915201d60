//! Bulk import of tax records from CSV.

mod loader;

pub use loader::{TaxRecordLoader, TaxRecordLoaderError, TaxRecordRow};
