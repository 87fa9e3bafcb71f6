//! # Sale Commands
//!
//! `SaleService` runs one command per request: load the aggregate, apply
//! the change, persist with a version check, log the business event.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update(number, draft, expectedVersion?)                                │
//! │                                                                         │
//! │  store.get_by_number ── None ──────────────────────► 404                │
//! │       │                                                                 │
//! │  expectedVersion ≠ sale.version ───────────────────► 409                │
//! │       │                                                                 │
//! │  sale.update(draft, now) ── canceled / invalid ────► 400                │
//! │       │                                                                 │
//! │  store.update(&sale, loaded version) ── lost race ─► 409                │
//! │       │                                                                 │
//! │  log SaleModified ─────────────────────────────────► 200 + sale         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule violation is caught on the in-memory aggregate before any
//! write reaches the store.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use salesdesk_core::{
    generate_sale_number, validation::validate_date_range, CoreError, DateRange, Sale, SaleDraft,
    SaleEvent, SaleSummary,
};
use salesdesk_db::SaleStore;

use crate::error::ApiError;

/// Current time at the precision the store keeps (microseconds).
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Writes a business event as a structured log record.
fn emit(event: &SaleEvent) {
    info!(
        event_type = event.event_type(),
        number = %event.number(),
        payload = %event.to_json(),
        "Business event"
    );
}

/// Command and query entry point for sales.
#[derive(Clone)]
pub struct SaleService {
    store: Arc<dyn SaleStore>,
}

impl SaleService {
    pub fn new(store: Arc<dyn SaleStore>) -> Self {
        SaleService { store }
    }

    async fn load(&self, number: &str) -> Result<Sale, ApiError> {
        self.store
            .get_by_number(number)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(number.to_string()).into())
    }

    /// Returns the version the caller's write must match.
    fn check_version(sale: &Sale, expected: Option<i64>) -> Result<i64, ApiError> {
        match expected {
            Some(v) if v != sale.version() => Err(ApiError::version_conflict(format!(
                "Sale {} is at version {}, request expected {}",
                sale.number(),
                sale.version(),
                v
            ))),
            _ => Ok(sale.version()),
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Creates a sale with a generated number and the current time as its date.
    pub async fn create(&self, draft: SaleDraft) -> Result<Sale, ApiError> {
        let now = now();
        let sale = Sale::create(
            Uuid::new_v4().to_string(),
            generate_sale_number(now),
            draft,
            now,
        )?;

        self.store.create(&sale).await?;

        info!(
            number = %sale.number(),
            items = sale.items().len(),
            total = %sale.total_amount(),
            "Sale created"
        );
        emit(&SaleEvent::created(&sale));

        Ok(sale)
    }

    /// Replaces customer data and every item of an open sale.
    pub async fn update(
        &self,
        number: &str,
        draft: SaleDraft,
        expected_version: Option<i64>,
    ) -> Result<Sale, ApiError> {
        let mut sale = self.load(number).await?;
        let expected = Self::check_version(&sale, expected_version)?;

        sale.update(draft, now())?;
        self.store.update(&sale, expected).await?;

        info!(
            number = %sale.number(),
            version = sale.version(),
            total = %sale.total_amount(),
            "Sale updated"
        );
        emit(&SaleEvent::modified(&sale));

        Ok(sale)
    }

    /// Cancels a sale. A second cancel fails.
    pub async fn cancel(&self, number: &str, expected_version: Option<i64>) -> Result<Sale, ApiError> {
        let mut sale = self.load(number).await?;
        let expected = Self::check_version(&sale, expected_version)?;

        sale.cancel(now())?;
        self.store.cancel(&sale, expected).await?;

        info!(number = %sale.number(), version = sale.version(), "Sale canceled");
        emit(&SaleEvent::canceled(&sale));

        Ok(sale)
    }

    /// Cancels one product line of an open sale.
    pub async fn cancel_item(&self, number: &str, product_code: &str) -> Result<Sale, ApiError> {
        let mut sale = self.load(number).await?;
        let expected = sale.version();

        let removed = sale.remove_item(product_code, now())?;
        self.store.update(&sale, expected).await?;

        info!(
            number = %sale.number(),
            product_code = %removed.product_code(),
            total = %sale.total_amount(),
            "Sale item canceled"
        );
        emit(&SaleEvent::item_canceled(&sale, &removed));

        Ok(sale)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub async fn get(&self, number: &str) -> Result<Sale, ApiError> {
        debug!(number = %number, "get sale");
        self.load(number).await
    }

    /// Summaries in the inclusive date range, newest first.
    pub async fn list(&self, range: DateRange) -> Result<Vec<SaleSummary>, ApiError> {
        validate_date_range(&range)?;
        debug!(start = ?range.start, end = ?range.end, "list sales");
        Ok(self.store.list(range).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesdesk_core::{Money, NewSaleItem};
    use salesdesk_db::{Database, DbConfig};

    use crate::error::ErrorCode;

    async fn service() -> SaleService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SaleService::new(Arc::new(db.sales()))
    }

    fn draft(items: &[(&str, i64, i64)]) -> SaleDraft {
        SaleDraft {
            customer_name: "Ada Lovelace".to_string(),
            customer_document: "123.456.789-00".to_string(),
            items: items
                .iter()
                .map(|(code, qty, cents)| NewSaleItem {
                    product_name: format!("Product {code}"),
                    product_code: code.to_string(),
                    quantity: *qty,
                    unit_price: Money::from_cents(*cents),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_number_and_persists() {
        let svc = service().await;
        let sale = svc.create(draft(&[("A", 10, 10_000)])).await.unwrap();

        assert!(sale.number().starts_with("SALE-"));
        let loaded = svc.get(sale.number()).await.unwrap();
        assert_eq!(loaded, sale);
    }

    #[tokio::test]
    async fn test_duplicate_codes_persist_nothing() {
        let svc = service().await;
        let err = svc
            .create(draft(&[("A", 1, 100), ("A", 2, 100)]))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(svc.list(DateRange::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_canceled_sale_leaves_state() {
        let svc = service().await;
        let sale = svc.create(draft(&[("A", 1, 100)])).await.unwrap();
        let canceled = svc.cancel(sale.number(), None).await.unwrap();

        let err = svc
            .update(sale.number(), draft(&[("B", 5, 100)]), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SaleCanceled);

        let stored = svc.get(sale.number()).await.unwrap();
        assert_eq!(stored, canceled);
    }

    #[tokio::test]
    async fn test_stale_expected_version_conflicts() {
        let svc = service().await;
        let sale = svc.create(draft(&[("A", 1, 100)])).await.unwrap();
        svc.update(sale.number(), draft(&[("A", 2, 100)]), Some(1))
            .await
            .unwrap();

        let err = svc
            .update(sale.number(), draft(&[("A", 3, 100)]), Some(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VersionConflict);

        let err = svc.cancel(sale.number(), Some(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VersionConflict);
        assert!(!svc.get(sale.number()).await.unwrap().is_canceled());
    }

    #[tokio::test]
    async fn test_cancel_twice_and_unknown() {
        let svc = service().await;
        let sale = svc.create(draft(&[("A", 1, 100)])).await.unwrap();

        svc.cancel(sale.number(), None).await.unwrap();
        let err = svc.cancel(sale.number(), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyCanceled);

        let err = svc.cancel("SALE-NOPE", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_cancel_item() {
        let svc = service().await;
        let sale = svc
            .create(draft(&[("A", 5, 10_000), ("B", 5, 15_000)]))
            .await
            .unwrap();

        let updated = svc.cancel_item(sale.number(), "A").await.unwrap();
        assert_eq!(updated.total_amount().cents(), 67_500);
        assert_eq!(updated.version(), 2);

        let err = svc.cancel_item(sale.number(), "B").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = svc.cancel_item(sale.number(), "ZZZ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_range() {
        let svc = service().await;
        let now = Utc::now();
        let err = svc
            .list(DateRange::new(Some(now), Some(now - chrono::Duration::days(1))))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.errors[0].field, "startDate");
    }
}
