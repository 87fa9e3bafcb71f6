//! # SalesDesk Sales API
//!
//! HTTP JSON service for recording sales, with tiered quantity discounts
//! and a cancel lifecycle.
//!
//! ## Module Organization
//! ```text
//! sales_api/
//! ├── config     - Environment configuration
//! ├── telemetry  - tracing subscriber setup
//! ├── dto        - Request/response bodies
//! ├── error      - ApiError and HTTP status mapping
//! ├── service    - SaleService (commands + queries)
//! └── routes     - axum Router and handlers
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod service;
pub mod telemetry;

pub use config::{ApiConfig, ConfigError, LogFormat};
pub use error::{ApiError, ErrorCode};
pub use routes::{router, AppState};
pub use service::SaleService;

use axum::Router;
use salesdesk_db::Database;

/// Builds the full application over an opened database.
pub fn app(db: Database) -> Router {
    router(AppState::new(db))
}
