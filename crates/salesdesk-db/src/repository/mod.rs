//! # Repository Module
//!
//! Persistence contract for sales and its SQLite implementation.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SaleService (sales-api)                                               │
//! │       │                                                                 │
//! │       │  store.update(&sale, expected_version)                         │
//! │       ▼                                                                 │
//! │  dyn SaleStore                                                         │
//! │  ├── create(&sale)                                                     │
//! │  ├── get_by_number(number)                                             │
//! │  ├── list(range)                                                       │
//! │  ├── update(&sale, expected_version)                                   │
//! │  └── cancel(&sale, expected_version)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteSaleRepository ──► SQLite                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SqliteSaleRepository`](sale::SqliteSaleRepository) - Sales and their items

use async_trait::async_trait;
use salesdesk_core::{DateRange, Sale, SaleSummary};

use crate::error::DbResult;

pub mod sale;

/// Storage of sale aggregates, keyed by sale number.
///
/// ## Versioning
/// `update` and `cancel` are conditional writes: they succeed only while the
/// stored row still carries `expected_version`, and then store the version
/// held by `sale`. A mismatch yields [`DbError::VersionConflict`] and leaves
/// the row unchanged.
///
/// Every write is atomic. Dropping a returned future before it completes
/// rolls the write back.
///
/// [`DbError::VersionConflict`]: crate::DbError::VersionConflict
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Inserts a new sale with all of its items.
    async fn create(&self, sale: &Sale) -> DbResult<()>;

    /// Loads a sale with its items, or `None`.
    async fn get_by_number(&self, number: &str) -> DbResult<Option<Sale>>;

    /// Summaries of sales whose date lies in `range`, newest first.
    async fn list(&self, range: DateRange) -> DbResult<Vec<SaleSummary>>;

    /// Replaces customer data, status and the whole item collection.
    async fn update(&self, sale: &Sale, expected_version: i64) -> DbResult<()>;

    /// Stores the canceled status of `sale`. Items are left as they are.
    async fn cancel(&self, sale: &Sale, expected_version: i64) -> DbResult<()>;
}
