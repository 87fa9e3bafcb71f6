//! # Domain Types
//!
//! Command inputs, list summaries and query types shared by the repository
//! and the HTTP layer.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SaleDraft     │   │  SaleSummary    │   │   DateRange     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  customer_name  │   │  number         │   │  start (opt)    │       │
//! │  │  customer_doc   │   │  sale_date      │   │  end (opt)      │       │
//! │  │  items[]        │   │  total_amount   │   │  inclusive      │       │
//! │  └────────┬────────┘   │  is_canceled    │   └─────────────────┘       │
//! │           │            │  item_count     │                              │
//! │  ┌────────▼────────┐   └─────────────────┘   ┌─────────────────┐       │
//! │  │  NewSaleItem    │                         │   SaleStatus    │       │
//! │  │  ─────────────  │                         │  ─────────────  │       │
//! │  │  product_name   │                         │  Open           │       │
//! │  │  product_code   │                         │  Canceled       │       │
//! │  │  quantity       │                         └─────────────────┘       │
//! │  │  unit_price     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every sale has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `number`: `SALE-<yyyyMMddHHmmss>-<8 hex>` - the public business key

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::SALE_NUMBER_PREFIX;

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle state of a sale.
///
/// ## State Machine
/// ```text
/// ┌──────────┐   cancel()   ┌──────────┐
/// │   Open   │ ───────────► │ Canceled │   (terminal)
/// └──────────┘              └──────────┘
///   update / add_item / remove_item keep the sale Open
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Open,
    Canceled,
}

impl SaleStatus {
    /// Column value used by the database layer.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Open => "open",
            SaleStatus::Canceled => "canceled",
        }
    }

    pub const fn is_canceled(&self) -> bool {
        matches!(self, SaleStatus::Canceled)
    }
}

// =============================================================================
// Command Inputs
// =============================================================================

/// One requested line of a new or updated sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleItem {
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price: Money,
}

/// Customer data plus requested lines: the input of create and update.
///
/// The update command replaces everything a draft carries, so the same
/// type serves both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDraft {
    pub customer_name: String,
    pub customer_document: String,
    pub items: Vec<NewSaleItem>,
}

// =============================================================================
// Query Types
// =============================================================================

/// One row of the sale listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub number: String,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_document: String,
    #[serde(rename = "totalAmountCents")]
    pub total_amount: Money,
    pub is_canceled: bool,
    pub item_count: i64,
}

/// Inclusive sale-date filter. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Matches every date.
    pub const fn all() -> Self {
        DateRange {
            start: None,
            end: None,
        }
    }

    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        DateRange { start, end }
    }
}

// =============================================================================
// Sale Number
// =============================================================================

/// Builds a sale number from the creation instant and a random suffix.
///
/// Format: `SALE-<yyyyMMddHHmmss>-<8 lowercase hex>`.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use salesdesk_core::generate_sale_number;
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
/// let number = generate_sale_number(now);
/// assert!(number.starts_with("SALE-20260314092653-"));
/// assert_eq!(number.len(), "SALE-20260314092653-".len() + 8);
/// ```
pub fn generate_sale_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}-{}",
        SALE_NUMBER_PREFIX,
        now.format("%Y%m%d%H%M%S"),
        &suffix[..8]
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sale_status_serialization() {
        assert_eq!(serde_json::to_string(&SaleStatus::Open).unwrap(), "\"open\"");
        assert_eq!(
            serde_json::to_string(&SaleStatus::Canceled).unwrap(),
            "\"canceled\""
        );
        assert_eq!(SaleStatus::default(), SaleStatus::Open);
        assert!(SaleStatus::Canceled.is_canceled());
    }

    #[test]
    fn test_sale_number_format() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let number = generate_sale_number(now);

        let rest = number.strip_prefix("SALE-20260102030405-").unwrap();
        assert_eq!(rest.len(), 8);
        assert!(rest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sale_numbers_differ_within_one_second() {
        let now = Utc::now();
        assert_ne!(generate_sale_number(now), generate_sale_number(now));
    }

    #[test]
    fn test_summary_wire_names() {
        let summary = SaleSummary {
            number: "SALE-1".to_string(),
            sale_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            customer_name: "Ada".to_string(),
            customer_document: "123".to_string(),
            total_amount: Money::from_cents(80_000),
            is_canceled: false,
            item_count: 1,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalAmountCents"], 80_000);
        assert_eq!(json["isCanceled"], false);
        assert_eq!(json["itemCount"], 1);
    }
}
