pub mod calendar_date;
mod tax_record;

pub use tax_record::{NewTaxRecord, TaxRecord};
