//! Request and response bodies.
//!
//! Field names are camelCase on the wire and money is integer cents.
//! Text and numeric request fields default when absent, so a missing
//! `customerName` is reported as a validation error on that field instead
//! of a parse failure.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use salesdesk_core::{
    DateRange, DiscountTier, Money, NewSaleItem, Sale, SaleDraft, SaleItem, SaleStatus,
    SaleSummary, ValidationError, ValidationErrors,
};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleItemRequest {
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl From<SaleItemRequest> for NewSaleItem {
    fn from(req: SaleItemRequest) -> Self {
        NewSaleItem {
            product_name: req.product_name,
            product_code: req.product_code,
            quantity: req.quantity,
            unit_price: Money::from_cents(req.unit_price_cents),
        }
    }
}

/// `POST /sales`
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSaleRequest {
    pub customer_name: String,
    pub customer_document: String,
    pub items: Vec<SaleItemRequest>,
}

impl From<CreateSaleRequest> for SaleDraft {
    fn from(req: CreateSaleRequest) -> Self {
        SaleDraft {
            customer_name: req.customer_name,
            customer_document: req.customer_document,
            items: req.items.into_iter().map(NewSaleItem::from).collect(),
        }
    }
}

/// `PUT /sales/{number}`: full replacement of customer data and items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSaleRequest {
    pub customer_name: String,
    pub customer_document: String,
    pub items: Vec<SaleItemRequest>,
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
}

impl UpdateSaleRequest {
    pub fn into_parts(self) -> (SaleDraft, Option<i64>) {
        let draft = SaleDraft {
            customer_name: self.customer_name,
            customer_document: self.customer_document,
            items: self.items.into_iter().map(NewSaleItem::from).collect(),
        };
        (draft, self.expected_version)
    }
}

/// `POST /sales/{number}/cancel`. The body is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CancelSaleRequest {
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
}

/// `GET /sales?startDate=..&endDate=..`
///
/// Bounds are RFC 3339 timestamps. A bare `YYYY-MM-DD` is accepted too and
/// covers the whole UTC day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalesQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListSalesQuery {
    pub fn into_range(self) -> Result<DateRange, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let start = parse_bound("startDate", self.start_date.as_deref(), NaiveTime::default());
        let end = parse_bound("endDate", self.end_date.as_deref(), end_of_day());

        let start = start.unwrap_or_else(|e| {
            errors.push(e);
            None
        });
        let end = end.unwrap_or_else(|e| {
            errors.push(e);
            None
        });

        errors.into_result()?;
        Ok(DateRange::new(start, end))
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or_default()
}

fn parse_bound(
    field: &str,
    raw: Option<&str>,
    day_time: NaiveTime,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(day.and_time(day_time).and_utc()));
    }

    Err(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected an RFC 3339 timestamp or YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemResponse {
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_tier: DiscountTier,
    pub discount_percent: u32,
    pub discount_cents: i64,
    pub total_price_cents: i64,
}

impl From<&SaleItem> for SaleItemResponse {
    fn from(item: &SaleItem) -> Self {
        SaleItemResponse {
            product_name: item.product_name().to_string(),
            product_code: item.product_code().to_string(),
            quantity: item.quantity(),
            unit_price_cents: item.unit_price().cents(),
            discount_tier: item.discount_tier(),
            discount_percent: item.discount_tier().percent(),
            discount_cents: item.discount().cents(),
            total_price_cents: item.total_price().cents(),
        }
    }
}

/// Full sale detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: String,
    pub number: String,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_document: String,
    pub status: SaleStatus,
    pub is_canceled: bool,
    pub total_amount_cents: i64,
    pub version: i64,
    pub items: Vec<SaleItemResponse>,
}

impl From<&Sale> for SaleResponse {
    fn from(sale: &Sale) -> Self {
        SaleResponse {
            id: sale.id().to_string(),
            number: sale.number().to_string(),
            sale_date: sale.sale_date(),
            updated_at: sale.updated_at(),
            customer_name: sale.customer_name().to_string(),
            customer_document: sale.customer_document().to_string(),
            status: sale.status(),
            is_canceled: sale.is_canceled(),
            total_amount_cents: sale.total_amount().cents(),
            version: sale.version(),
            items: sale.items().iter().map(SaleItemResponse::from).collect(),
        }
    }
}

/// `GET /sales`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleListResponse {
    pub sales: Vec<SaleSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_fields_default() {
        let req: CreateSaleRequest = serde_json::from_str(r#"{"items":[{}]}"#).unwrap();
        let draft = SaleDraft::from(req);

        assert!(draft.customer_name.is_empty());
        assert_eq!(draft.items[0].quantity, 0);
    }

    #[test]
    fn test_update_request_version() {
        let req: UpdateSaleRequest = serde_json::from_str(
            r#"{"customerName":"Ada","customerDocument":"1","items":[],"expectedVersion":3}"#,
        )
        .unwrap();
        let (draft, expected) = req.into_parts();

        assert_eq!(draft.customer_name, "Ada");
        assert_eq!(expected, Some(3));
    }

    #[test]
    fn test_query_accepts_rfc3339_and_dates() {
        let range = ListSalesQuery {
            start_date: Some("2026-01-01".to_string()),
            end_date: Some("2026-01-31T12:00:00-03:00".to_string()),
        }
        .into_range()
        .unwrap();

        assert_eq!(range.start, Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(range.end, Some(Utc.with_ymd_and_hms(2026, 1, 31, 15, 0, 0).unwrap()));

        let end_only = ListSalesQuery {
            start_date: None,
            end_date: Some("2026-01-31".to_string()),
        }
        .into_range()
        .unwrap();
        assert_eq!(end_only.start, None);
        let last_second = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        assert_eq!(
            end_only.end,
            Some(last_second + chrono::Duration::microseconds(999_999))
        );
    }

    #[test]
    fn test_query_reports_bad_bounds() {
        let errors = ListSalesQuery {
            start_date: Some("yesterday".to_string()),
            end_date: Some("31/01/2026".to_string()),
        }
        .into_range()
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["startDate", "endDate"]);
    }
}
