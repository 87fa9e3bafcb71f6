//! # Business Events
//!
//! Facts produced by successful sale commands. The command layer writes
//! them to the log as structured records; nothing in this crate publishes
//! them anywhere.
//!
//! ```text
//! create  ──► SaleCreated
//! update  ──► SaleModified
//! cancel  ──► SaleCanceled
//! remove  ──► ItemCanceled
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::money::Money;
use crate::sale::{Sale, SaleItem};

/// A business event raised after a command was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "eventType", rename_all = "PascalCase")]
pub enum SaleEvent {
    #[serde(rename_all = "camelCase")]
    SaleCreated {
        number: String,
        sale_date: DateTime<Utc>,
        customer_name: String,
        item_count: usize,
        #[serde(rename = "totalAmountCents")]
        total_amount: Money,
    },
    #[serde(rename_all = "camelCase")]
    SaleModified {
        number: String,
        modified_at: DateTime<Utc>,
        item_count: usize,
        #[serde(rename = "totalAmountCents")]
        total_amount: Money,
        version: i64,
    },
    #[serde(rename_all = "camelCase")]
    SaleCanceled {
        number: String,
        canceled_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    ItemCanceled {
        number: String,
        product_code: String,
        quantity: i64,
        #[serde(rename = "totalPriceCents")]
        total_price: Money,
        #[serde(rename = "newTotalAmountCents")]
        new_total_amount: Money,
    },
}

impl SaleEvent {
    pub fn created(sale: &Sale) -> Self {
        SaleEvent::SaleCreated {
            number: sale.number().to_string(),
            sale_date: sale.sale_date(),
            customer_name: sale.customer_name().to_string(),
            item_count: sale.items().len(),
            total_amount: sale.total_amount(),
        }
    }

    pub fn modified(sale: &Sale) -> Self {
        SaleEvent::SaleModified {
            number: sale.number().to_string(),
            modified_at: sale.updated_at(),
            item_count: sale.items().len(),
            total_amount: sale.total_amount(),
            version: sale.version(),
        }
    }

    pub fn canceled(sale: &Sale) -> Self {
        SaleEvent::SaleCanceled {
            number: sale.number().to_string(),
            canceled_at: sale.updated_at(),
        }
    }

    /// `sale` is the state after `item` was removed.
    pub fn item_canceled(sale: &Sale, item: &SaleItem) -> Self {
        SaleEvent::ItemCanceled {
            number: sale.number().to_string(),
            product_code: item.product_code().to_string(),
            quantity: item.quantity(),
            total_price: item.total_price(),
            new_total_amount: sale.total_amount(),
        }
    }

    /// Stable name used as the `event_type` log field.
    pub fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated { .. } => "SaleCreated",
            SaleEvent::SaleModified { .. } => "SaleModified",
            SaleEvent::SaleCanceled { .. } => "SaleCanceled",
            SaleEvent::ItemCanceled { .. } => "ItemCanceled",
        }
    }

    pub fn number(&self) -> &str {
        match self {
            SaleEvent::SaleCreated { number, .. }
            | SaleEvent::SaleModified { number, .. }
            | SaleEvent::SaleCanceled { number, .. }
            | SaleEvent::ItemCanceled { number, .. } => number,
        }
    }

    /// JSON payload for structured logging.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"eventType\":\"{}\"}}", self.event_type()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewSaleItem, SaleDraft};

    fn sale() -> Sale {
        Sale::create(
            "id".to_string(),
            "SALE-20260101000000-0badc0de".to_string(),
            SaleDraft {
                customer_name: "Ada".to_string(),
                customer_document: "1".to_string(),
                items: vec![
                    NewSaleItem {
                        product_name: "Beer".to_string(),
                        product_code: "BEER".to_string(),
                        quantity: 10,
                        unit_price: Money::from_cents(10_000),
                    },
                    NewSaleItem {
                        product_name: "Wine".to_string(),
                        product_code: "WINE".to_string(),
                        quantity: 1,
                        unit_price: Money::from_cents(5_000),
                    },
                ],
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_created_payload() {
        let event = SaleEvent::created(&sale());
        let json: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();

        assert_eq!(event.event_type(), "SaleCreated");
        assert_eq!(json["eventType"], "SaleCreated");
        assert_eq!(json["number"], "SALE-20260101000000-0badc0de");
        assert_eq!(json["itemCount"], 2);
        assert_eq!(json["totalAmountCents"], 85_000);
    }

    #[test]
    fn test_item_canceled_payload() {
        let mut sale = sale();
        let removed = sale.remove_item("WINE", Utc::now()).unwrap();
        let event = SaleEvent::item_canceled(&sale, &removed);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "ItemCanceled");
        assert_eq!(json["productCode"], "WINE");
        assert_eq!(json["newTotalAmountCents"], 80_000);
        assert_eq!(event.number(), sale.number());
    }
}
