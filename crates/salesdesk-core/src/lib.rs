//! # salesdesk-core: Pure Business Logic for SalesDesk
//!
//! This crate is the **heart** of SalesDesk. It contains the sale aggregate,
//! the quantity discount rule and all validation as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SalesDesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP clients (JSON)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sales-api (axum)                             │   │
//! │  │    routes ──► SaleService commands (create/update/cancel...)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salesdesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   sale    │  │ discount  │  │   money   │  │ validation│  │   │
//! │  │   │   Sale    │  │   Tier    │  │   Money   │  │   rules   │  │   │
//! │  │   │ SaleItem  │  │  pricing  │  │  (cents)  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                salesdesk-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repository             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sale`] - The `Sale` aggregate and its `SaleItem` lines
//! - [`discount`] - Quantity-based discount tiers and line pricing
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Commands inputs, list summaries, date ranges
//! - [`validation`] - Field-level business rule validation
//! - [`events`] - Business events emitted after successful commands
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use salesdesk_core::{Money, NewSaleItem, Sale, SaleDraft};
//!
//! let draft = SaleDraft {
//!     customer_name: "Ada Lovelace".to_string(),
//!     customer_document: "123.456.789-00".to_string(),
//!     items: vec![NewSaleItem {
//!         product_name: "Beer".to_string(),
//!         product_code: "BEER-01".to_string(),
//!         quantity: 10,
//!         unit_price: Money::from_cents(10_000),
//!     }],
//! };
//!
//! let sale = Sale::create("id-1".to_string(), "SALE-1".to_string(), draft, Utc::now()).unwrap();
//!
//! // 10 units earn the 20% tier: $1000.00 - $200.00
//! assert_eq!(sale.total_amount().cents(), 80_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod events;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{DiscountTier, LinePricing};
pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use events::SaleEvent;
pub use money::Money;
pub use sale::{Sale, SaleItem, StoredSale, StoredSaleItem};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest quantity a sale line may carry.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Largest quantity of a single product in one sale.
///
/// ## Business Reason
/// Identical items above 20 units cannot be sold in a single transaction.
pub const MAX_ITEM_QUANTITY: i64 = 20;

/// Maximum number of distinct product lines in one sale.
pub const MAX_SALE_ITEMS: usize = 20;

/// Largest accepted unit price, in cents ($10,000,000,000.00).
///
/// A full sale at this price (20 lines of 20 units) stays far inside `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000_000;

/// Maximum length of a customer name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Maximum length of a customer document (CPF, CNPJ, tax id...).
pub const MAX_CUSTOMER_DOCUMENT_LEN: usize = 20;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 100;

/// Maximum length of a product code.
pub const MAX_PRODUCT_CODE_LEN: usize = 20;

/// Prefix of every generated sale number.
pub const SALE_NUMBER_PREFIX: &str = "SALE-";
