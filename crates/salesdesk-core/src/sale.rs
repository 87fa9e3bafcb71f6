//! # Sale Aggregate
//!
//! The `Sale` aggregate and its `SaleItem` lines. Every rule about what a
//! sale may look like lives here; the database and HTTP layers only move
//! sales around.
//!
//! ## Aggregate Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale                                                                   │
//! │  ├── id, number, sale_date                 (fixed at creation)          │
//! │  ├── customer_name, customer_document      (replaced by update)         │
//! │  ├── status: Open ──cancel()──► Canceled   (one way)                    │
//! │  ├── version, updated_at                   (bumped by every mutation)   │
//! │  ├── total_amount = Σ items.total_price    (derived, private)           │
//! │  └── items: Vec<SaleItem>                                               │
//! │        ├── product_name, product_code, quantity, unit_price             │
//! │        └── discount, total_price           (derived, private)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutation Paths
//! Derived values have no setters. They change only through:
//! - [`Sale::create`] / [`Sale::restore`] - computed from scratch
//! - [`Sale::update`], [`Sale::add_item`], [`Sale::remove_item`] -
//!   recomputed after the item collection changes
//!
//! Clock reads stay outside: every mutating method takes `now`.

use chrono::{DateTime, Utc};

use crate::discount::{DiscountTier, LinePricing};
use crate::error::{CoreError, CoreResult, ValidationError, ValidationErrors};
use crate::money::Money;
use crate::types::{NewSaleItem, SaleDraft, SaleStatus, SaleSummary};
use crate::validation::{validate_draft, validate_item};
use crate::MAX_SALE_ITEMS;

// =============================================================================
// Sale Item
// =============================================================================

/// One product line of a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItem {
    product_name: String,
    product_code: String,
    quantity: i64,
    unit_price: Money,
    pricing: LinePricing,
}

impl SaleItem {
    /// Validates a requested line and prices it.
    ///
    /// ## Example
    /// ```rust
    /// use salesdesk_core::{Money, NewSaleItem, SaleItem};
    ///
    /// let item = SaleItem::new(NewSaleItem {
    ///     product_name: "Beer".to_string(),
    ///     product_code: "BEER-01".to_string(),
    ///     quantity: 5,
    ///     unit_price: Money::from_cents(15_000),
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(item.discount().cents(), 7_500);
    /// assert_eq!(item.total_price().cents(), 67_500);
    /// ```
    pub fn new(item: NewSaleItem) -> Result<Self, ValidationErrors> {
        validate_item("item", &item).into_result()?;
        Ok(Self::priced(item))
    }

    /// Prices an already-validated line.
    fn priced(item: NewSaleItem) -> Self {
        let pricing = LinePricing::compute(item.unit_price, item.quantity);
        SaleItem {
            product_name: item.product_name.trim().to_string(),
            product_code: item.product_code.trim().to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            pricing,
        }
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// unit_price × quantity, before discount.
    pub fn gross(&self) -> Money {
        self.pricing.gross
    }

    pub fn discount_tier(&self) -> DiscountTier {
        self.pricing.tier
    }

    pub fn discount(&self) -> Money {
        self.pricing.discount
    }

    pub fn total_price(&self) -> Money {
        self.pricing.total
    }
}

// =============================================================================
// Stored Representation
// =============================================================================

/// Persisted line: only the inputs. Derived values are recomputed on load.
pub type StoredSaleItem = NewSaleItem;

/// Everything the database keeps about a sale, as read back from storage.
#[derive(Debug, Clone)]
pub struct StoredSale {
    pub id: String,
    pub number: String,
    pub sale_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_document: String,
    pub status: SaleStatus,
    pub version: i64,
    pub items: Vec<StoredSaleItem>,
}

// =============================================================================
// Sale
// =============================================================================

/// A customer transaction with its lines and derived total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    id: String,
    number: String,
    sale_date: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    customer_name: String,
    customer_document: String,
    status: SaleStatus,
    items: Vec<SaleItem>,
    total_amount: Money,
    version: i64,
}

impl Sale {
    /// Validates a draft and builds a new open sale at version 1.
    ///
    /// `id` and `number` are generated by the caller (see
    /// [`generate_sale_number`](crate::generate_sale_number)).
    pub fn create(
        id: String,
        number: String,
        draft: SaleDraft,
        now: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        validate_draft(&draft)?;

        let mut sale = Sale {
            id,
            number,
            sale_date: now,
            updated_at: now,
            customer_name: draft.customer_name.trim().to_string(),
            customer_document: draft.customer_document.trim().to_string(),
            status: SaleStatus::Open,
            items: draft.items.into_iter().map(SaleItem::priced).collect(),
            total_amount: Money::zero(),
            version: 1,
        };
        sale.recalculate_total();

        Ok(sale)
    }

    /// Rebuilds a sale from storage, recomputing every derived value.
    pub fn restore(stored: StoredSale) -> Sale {
        let mut sale = Sale {
            id: stored.id,
            number: stored.number,
            sale_date: stored.sale_date,
            updated_at: stored.updated_at,
            customer_name: stored.customer_name,
            customer_document: stored.customer_document,
            status: stored.status,
            items: stored.items.into_iter().map(SaleItem::priced).collect(),
            total_amount: Money::zero(),
            version: stored.version,
        };
        sale.recalculate_total();
        sale
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_document(&self) -> &str {
        &self.customer_document
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn is_canceled(&self) -> bool {
        self.status.is_canceled()
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn item(&self, product_code: &str) -> Option<&SaleItem> {
        self.items.iter().find(|i| i.product_code == product_code)
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Optimistic concurrency token. Starts at 1.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Listing row for this sale.
    pub fn summary(&self) -> SaleSummary {
        SaleSummary {
            number: self.number.clone(),
            sale_date: self.sale_date,
            customer_name: self.customer_name.clone(),
            customer_document: self.customer_document.clone(),
            total_amount: self.total_amount,
            is_canceled: self.is_canceled(),
            item_count: self.items.len() as i64,
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Replaces customer data and the whole item collection.
    ///
    /// No partial merge: lines absent from `draft` are gone afterwards.
    /// On error the sale is left untouched.
    pub fn update(&mut self, draft: SaleDraft, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_open()?;
        validate_draft(&draft)?;

        self.customer_name = draft.customer_name.trim().to_string();
        self.customer_document = draft.customer_document.trim().to_string();
        self.items = draft.items.into_iter().map(SaleItem::priced).collect();
        self.recalculate_total();
        self.touch(now);

        Ok(())
    }

    /// Adds one line to an open sale.
    pub fn add_item(&mut self, item: NewSaleItem, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_open()?;
        let item = SaleItem::new(item)?;

        if self.item(item.product_code()).is_some() {
            return Err(ValidationError::Duplicate {
                field: "item.productCode".to_string(),
                value: item.product_code,
            }
            .into());
        }
        if self.items.len() >= MAX_SALE_ITEMS {
            return Err(ValidationError::TooMany {
                field: "items".to_string(),
                max: MAX_SALE_ITEMS,
            }
            .into());
        }

        self.items.push(item);
        self.recalculate_total();
        self.touch(now);

        Ok(())
    }

    /// Cancels a single line (item cancellation) and returns it.
    ///
    /// ## Errors
    /// - `SaleCanceled` when the sale is canceled
    /// - `ItemNotFound` when no line has `product_code`
    /// - `Validation` when it is the last line: a sale keeps at least one item
    pub fn remove_item(&mut self, product_code: &str, now: DateTime<Utc>) -> CoreResult<SaleItem> {
        self.ensure_open()?;

        let position = self
            .items
            .iter()
            .position(|i| i.product_code == product_code)
            .ok_or_else(|| CoreError::ItemNotFound {
                number: self.number.clone(),
                product_code: product_code.to_string(),
            })?;

        if self.items.len() == 1 {
            return Err(ValidationError::EmptyCollection {
                field: "items".to_string(),
            }
            .into());
        }

        let removed = self.items.remove(position);
        self.recalculate_total();
        self.touch(now);

        Ok(removed)
    }

    /// Moves the sale to `Canceled`. Totals and items are kept as they were.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.is_canceled() {
            return Err(CoreError::AlreadyCanceled {
                number: self.number.clone(),
            });
        }

        self.status = SaleStatus::Canceled;
        self.touch(now);

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_canceled() {
            return Err(CoreError::SaleCanceled {
                number: self.number.clone(),
            });
        }
        Ok(())
    }

    /// total_amount = Σ items.total_price, from scratch.
    fn recalculate_total(&mut self) {
        self.total_amount = self.items.iter().map(SaleItem::total_price).sum();
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
