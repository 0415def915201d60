//! Request and response shapes for the HTTP API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::models::calendar_date;
use tax_core::{NewTaxRecord, TaxRecord};

use crate::error::ApiError;

/// Query string of `GET /api/tax`. Also used to build the `Location` of a
/// freshly created record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    pub municipality: String,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
}

impl RateQuery {
    pub fn to_query_string(&self) -> Result<String, ApiError> {
        serde_urlencoded::to_string(self)
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("encoding location query")))
    }
}

/// Body of `POST /api/tax` and `PUT /api/tax/:id`.
///
/// `id` is optional on the wire and ignored on create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRecordPayload {
    #[serde(default)]
    pub id: i64,
    pub municipality: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub rate: Decimal,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
}

impl TaxRecordPayload {
    pub fn require_municipality(&self) -> Result<(), ApiError> {
        if self.municipality.trim().is_empty() {
            return Err(ApiError::Validation("Municipality is required.".to_string()));
        }
        Ok(())
    }

    pub fn require_ordered_window(&self) -> Result<(), ApiError> {
        if self.start_date > self.end_date {
            return Err(ApiError::Validation(
                "StartDate cannot be after EndDate.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_id(&self, route_id: i64) -> Result<(), ApiError> {
        if self.id != route_id {
            return Err(ApiError::Validation(
                "Route ID does not match the TaxRecord ID.".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<TaxRecordPayload> for NewTaxRecord {
    fn from(payload: TaxRecordPayload) -> Self {
        NewTaxRecord {
            municipality: payload.municipality,
            rate: payload.rate,
            start_date: payload.start_date,
            end_date: payload.end_date,
        }
    }
}

impl From<TaxRecordPayload> for TaxRecord {
    fn from(payload: TaxRecordPayload) -> Self {
        let id = payload.id;
        NewTaxRecord::from(payload).with_id(id)
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

    #[test]
    fn payload_without_id_defaults_to_zero() {
        let payload: TaxRecordPayload = serde_json::from_str(
            r#"{"municipality":"Copenhagen","rate":0.2,"startDate":"2024-01-01","endDate":"2024-12-31"}"#,
        )
        .unwrap();

        assert_eq!(payload.id, 0);
        assert_eq!(payload.rate, dec!(0.2));
        assert_eq!(payload.end_date, date(2024, 12, 31));
    }

    #[test]
    fn payload_accepts_datetimes() {
        let payload: TaxRecordPayload = serde_json::from_str(
            r#"{"id":3,"municipality":"Aarhus","rate":1,"startDate":"2025-03-01T00:00:00","endDate":"2025-03-31T23:59:59Z"}"#,
        )
        .unwrap();

        assert_eq!(payload.start_date, date(2025, 3, 1));
        assert_eq!(payload.end_date, date(2025, 3, 31));
    }

    #[test]
    fn validation_messages() {
        let payload = TaxRecordPayload {
            id: 2,
            municipality: "  ".to_string(),
            rate: dec!(0.1),
            start_date: date(2025, 12, 31),
            end_date: date(2025, 1, 1),
        };

        assert_eq!(
            payload.require_municipality().unwrap_err().to_string(),
            "Municipality is required."
        );
        assert_eq!(
            payload.require_ordered_window().unwrap_err().to_string(),
            "StartDate cannot be after EndDate."
        );
        assert_eq!(
            payload.require_id(1).unwrap_err().to_string(),
            "Route ID does not match the TaxRecord ID."
        );
        assert!(payload.require_id(2).is_ok());
    }

    #[test]
    fn query_string_is_url_encoded() {
        let query = RateQuery {
            municipality: "Lyngby Taarbæk".to_string(),
            date: date(2024, 5, 1),
        };

        assert_eq!(
            query.to_query_string().unwrap(),
            "municipality=Lyngby+Taarb%C3%A6k&date=2024-05-01"
        );
    }
}
