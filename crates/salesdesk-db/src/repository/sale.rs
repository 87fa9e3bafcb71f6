//! # Sale Repository
//!
//! SQLite implementation of [`SaleStore`].
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update(&sale, expected_version)                                        │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── UPDATE sales SET ..., version = sale.version                      │
//! │   │     WHERE number = ? AND version = expected_version                 │
//! │   │        │                                                            │
//! │   │        └── 0 rows? ── number exists? ── yes → VersionConflict       │
//! │   │                                      └─ no  → NotFound              │
//! │   ├── DELETE FROM sale_items WHERE sale_id = ?                          │
//! │   └── INSERT INTO sale_items ... (one per line, in order)               │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Early return or dropped future → transaction dropped → ROLLBACK        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reads
//! `get_by_number` reads the sale row and its lines inside one transaction,
//! so a concurrent update is seen either entirely or not at all.
//!
//! ## Timestamps
//! Dates are stored as fixed-width RFC 3339 text in UTC with microsecond
//! precision (`2026-01-31T12:00:00.000000Z`), so string comparison in SQL
//! matches chronological order.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::SaleStore;
use crate::error::{DbError, DbResult};
use salesdesk_core::{
    DateRange, Money, Sale, SaleStatus, SaleSummary, StoredSale, StoredSaleItem,
};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    number: String,
    sale_date: String,
    updated_at: String,
    customer_name: String,
    customer_document: String,
    status: String,
    version: i64,
}

#[derive(Debug, FromRow)]
struct SaleItemRow {
    product_name: String,
    product_code: String,
    quantity: i64,
    unit_price_cents: i64,
}

#[derive(Debug, FromRow)]
struct SaleSummaryRow {
    number: String,
    sale_date: String,
    customer_name: String,
    customer_document: String,
    total_amount_cents: i64,
    status: String,
    item_count: i64,
}

impl From<SaleItemRow> for StoredSaleItem {
    fn from(row: SaleItemRow) -> Self {
        StoredSaleItem {
            product_name: row.product_name,
            product_code: row.product_code,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
        }
    }
}

impl TryFrom<SaleSummaryRow> for SaleSummary {
    type Error = DbError;

    fn try_from(row: SaleSummaryRow) -> DbResult<Self> {
        Ok(SaleSummary {
            sale_date: parse_timestamp(&row.sale_date)?,
            is_canceled: parse_status(&row.status)?.is_canceled(),
            number: row.number,
            customer_name: row.customer_name,
            customer_document: row.customer_document,
            total_amount: Money::from_cents(row.total_amount_cents),
            item_count: row.item_count,
        })
    }
}

// =============================================================================
// Column Codecs
// =============================================================================

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::corrupt("sales", format!("bad timestamp '{raw}': {e}")))
}

fn parse_status(raw: &str) -> DbResult<SaleStatus> {
    match raw {
        "open" => Ok(SaleStatus::Open),
        "canceled" => Ok(SaleStatus::Canceled),
        other => Err(DbError::corrupt("sales", format!("unknown status '{other}'"))),
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SqliteSaleRepository {
    pool: SqlitePool,
}

impl SqliteSaleRepository {
    /// Creates a new SqliteSaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSaleRepository { pool }
    }

    /// Inserts every line of `sale`, preserving order.
    async fn insert_items(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        for (position, item) in sale.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, position,
                    product_name, product_code, quantity,
                    unit_price_cents, discount_cents, total_price_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(sale.id())
            .bind(position as i64)
            .bind(item.product_name())
            .bind(item.product_code())
            .bind(item.quantity())
            .bind(item.unit_price().cents())
            .bind(item.discount().cents())
            .bind(item.total_price().cents())
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Turns a conditional write that touched no row into the right error.
    async fn missed_write(conn: &mut SqliteConnection, number: &str, expected: i64) -> DbError {
        let exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM sales WHERE number = ?1")
            .bind(number)
            .fetch_optional(&mut *conn)
            .await;

        match exists {
            Ok(Some(_)) => DbError::version_conflict(number, expected),
            Ok(None) => DbError::not_found("Sale", number),
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl SaleStore for SqliteSaleRepository {
    async fn create(&self, sale: &Sale) -> DbResult<()> {
        debug!(number = %sale.number(), items = sale.items().len(), "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, number, sale_date, updated_at,
                customer_name, customer_document,
                status, total_amount_cents, version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(sale.id())
        .bind(sale.number())
        .bind(format_timestamp(sale.sale_date()))
        .bind(format_timestamp(sale.updated_at()))
        .bind(sale.customer_name())
        .bind(sale.customer_document())
        .bind(sale.status().as_str())
        .bind(sale.total_amount().cents())
        .bind(sale.version())
        .execute(&mut *tx)
        .await?;

        Self::insert_items(&mut *tx, sale).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_by_number(&self, number: &str) -> DbResult<Option<Sale>> {
        // Header and lines come from one snapshot
        let mut tx = self.pool.begin().await?;

        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT
                id, number, sale_date, updated_at,
                customer_name, customer_document,
                status, version
            FROM sales
            WHERE number = ?1
            "#,
        )
        .bind(number)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<SaleItemRow> = sqlx::query_as(
            r#"
            SELECT product_name, product_code, quantity, unit_price_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let stored = StoredSale {
            sale_date: parse_timestamp(&row.sale_date)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            status: parse_status(&row.status)?,
            id: row.id,
            number: row.number,
            customer_name: row.customer_name,
            customer_document: row.customer_document,
            version: row.version,
            items: items.into_iter().map(StoredSaleItem::from).collect(),
        };

        Ok(Some(Sale::restore(stored)))
    }

    async fn list(&self, range: DateRange) -> DbResult<Vec<SaleSummary>> {
        let rows: Vec<SaleSummaryRow> = sqlx::query_as(
            r#"
            SELECT
                s.number, s.sale_date, s.customer_name, s.customer_document,
                s.total_amount_cents, s.status,
                COUNT(i.id) AS item_count
            FROM sales s
            LEFT JOIN sale_items i ON i.sale_id = s.id
            WHERE (?1 IS NULL OR s.sale_date >= ?1)
              AND (?2 IS NULL OR s.sale_date <= ?2)
            GROUP BY s.id
            ORDER BY s.sale_date DESC, s.number DESC
            "#,
        )
        .bind(range.start.map(format_timestamp))
        .bind(range.end.map(format_timestamp))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed sales");

        rows.into_iter().map(SaleSummary::try_from).collect()
    }

    async fn update(&self, sale: &Sale, expected_version: i64) -> DbResult<()> {
        debug!(
            number = %sale.number(),
            expected_version,
            version = sale.version(),
            "Updating sale"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                customer_name = ?1,
                customer_document = ?2,
                status = ?3,
                total_amount_cents = ?4,
                updated_at = ?5,
                version = ?6
            WHERE number = ?7 AND version = ?8
            "#,
        )
        .bind(sale.customer_name())
        .bind(sale.customer_document())
        .bind(sale.status().as_str())
        .bind(sale.total_amount().cents())
        .bind(format_timestamp(sale.updated_at()))
        .bind(sale.version())
        .bind(sale.number())
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::missed_write(&mut *tx, sale.number(), expected_version).await);
        }

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(sale.id())
            .execute(&mut *tx)
            .await?;

        Self::insert_items(&mut *tx, sale).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn cancel(&self, sale: &Sale, expected_version: i64) -> DbResult<()> {
        debug!(
            number = %sale.number(),
            expected_version,
            version = sale.version(),
            "Canceling sale"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                status = ?1,
                updated_at = ?2,
                version = ?3
            WHERE number = ?4 AND version = ?5
            "#,
        )
        .bind(sale.status().as_str())
        .bind(format_timestamp(sale.updated_at()))
        .bind(sale.version())
        .bind(sale.number())
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::missed_write(&mut *tx, sale.number(), expected_version).await);
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
