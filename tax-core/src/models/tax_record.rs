use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calendar_date;

/// A municipal tax rate valid over an inclusive date window.
///
/// Several records may exist for the same municipality, and their windows
/// may overlap (a yearly base rate and a daily override, for example).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRecord {
    pub id: i64,
    pub municipality: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub rate: Decimal,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
}

impl TaxRecord {
    /// Difference in days between `end_date` and `start_date`.
    ///
    /// A single-day window has length 0. Inverted windows yield a negative
    /// value; the store does not reject them.
    pub fn window_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Whether `date` falls inside the inclusive validity window.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// For inserting new records (no id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaxRecord {
    pub municipality: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub rate: Decimal,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
}

impl NewTaxRecord {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> TaxRecord {
        TaxRecord {
            id,
            municipality: self.municipality,
            rate: self.rate,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
