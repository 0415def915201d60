//! Narrowest-window resolution of overlapping tax records.
//!
//! A municipality commonly carries a broad default (a yearly rate) plus
//! narrower overrides (a monthly, weekly or single-day rate) whose windows
//! sit inside it. For a given date every one of those windows may match;
//! the most specific, i.e. shortest, one applies.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use tax_core::TaxRecord;
//! use tax_core::calculations::applicable_rate;
//!
//! let jan_first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let candidates = vec![
//!     TaxRecord {
//!         id: 1,
//!         municipality: "Copenhagen".to_string(),
//!         rate: dec!(0.2),
//!         start_date: jan_first,
//!         end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//!     },
//!     TaxRecord {
//!         id: 2,
//!         municipality: "Copenhagen".to_string(),
//!         rate: dec!(0.1),
//!         start_date: jan_first,
//!         end_date: jan_first,
//!     },
//! ];
//!
//! assert_eq!(applicable_rate(&candidates), Ok(dec!(0.1)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::TaxRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No candidate window covers the requested date.
    #[error("no tax record found for that municipality and date")]
    NoMatchingRecord,
}

/// Pick the record with the smallest `end_date - start_date`.
///
/// Candidates of equal width resolve to the one that appears first, so the
/// caller's ordering (ascending id from every repository) is the tie-break.
///
/// # Errors
///
/// [`ResolveError::NoMatchingRecord`] when `candidates` is empty.
pub fn resolve_rate(candidates: &[TaxRecord]) -> Result<&TaxRecord, ResolveError> {
    candidates
        .iter()
        .reduce(|best, next| {
            if next.window_days() < best.window_days() {
                next
            } else {
                best
            }
        })
        .ok_or(ResolveError::NoMatchingRecord)
}

/// The rate of the record chosen by [`resolve_rate`].
pub fn applicable_rate(candidates: &[TaxRecord]) -> Result<Decimal, ResolveError> {
    resolve_rate(candidates).map(|record| record.rate)
}
