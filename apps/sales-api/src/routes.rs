//! # HTTP Routes
//!
//! | Method | Path                                   | Success |
//! |--------|----------------------------------------|---------|
//! | POST   | `/sales`                               | 201     |
//! | GET    | `/sales?startDate=..&endDate=..`       | 200     |
//! | GET    | `/sales/:number`                       | 200     |
//! | PUT    | `/sales/:number`                       | 200     |
//! | POST   | `/sales/:number/cancel`                | 200     |
//! | DELETE | `/sales/:number/items/:product_code`   | 200     |
//! | GET    | `/health`                              | 200/503 |
//!
//! Handlers only translate between HTTP and `SaleService`. Extractor
//! rejections are turned into `MALFORMED_REQUEST` bodies so every error
//! response has the same shape.

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use salesdesk_db::Database;

use crate::dto::{
    CancelSaleRequest, CreateSaleRequest, ListSalesQuery, SaleListResponse, SaleResponse,
    UpdateSaleRequest,
};
use crate::error::ApiError;
use crate::service::SaleService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: SaleService,
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState {
            service: SaleService::new(Arc::new(db.sales())),
            db,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sales", post(create_sale).get(list_sales))
        .route("/sales/:number", get(get_sale).put(update_sale))
        .route("/sales/:number/cancel", post(cancel_sale))
        .route("/sales/:number/items/:product_code", delete(cancel_sale_item))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::malformed(rejection.body_text()))
}

// =============================================================================
// Handlers
// =============================================================================

async fn create_sale(
    State(state): State<AppState>,
    body: Result<Json<CreateSaleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(body)?;
    let sale = state.service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(SaleResponse::from(&sale))))
}

async fn get_sale(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale = state.service.get(&number).await?;
    Ok(Json(SaleResponse::from(&sale)))
}

async fn list_sales(
    State(state): State<AppState>,
    query: Result<Query<ListSalesQuery>, QueryRejection>,
) -> Result<Json<SaleListResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::malformed(rejection.body_text()))?;
    let sales = state.service.list(query.into_range()?).await?;
    Ok(Json(SaleListResponse { sales }))
}

async fn update_sale(
    State(state): State<AppState>,
    Path(number): Path<String>,
    body: Result<Json<UpdateSaleRequest>, JsonRejection>,
) -> Result<Json<SaleResponse>, ApiError> {
    let (draft, expected_version) = json_body(body)?.into_parts();
    let sale = state.service.update(&number, draft, expected_version).await?;
    Ok(Json(SaleResponse::from(&sale)))
}

/// The body is optional; an empty one cancels unconditionally.
async fn cancel_sale(
    State(state): State<AppState>,
    Path(number): Path<String>,
    body: Bytes,
) -> Result<Json<SaleResponse>, ApiError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        CancelSaleRequest::default()
    } else {
        serde_json::from_slice::<CancelSaleRequest>(&body)
            .map_err(|e| ApiError::malformed(format!("Invalid cancel body: {}", e)))?
    };

    let sale = state.service.cancel(&number, req.expected_version).await?;
    Ok(Json(SaleResponse::from(&sale)))
}

async fn cancel_sale_item(
    State(state): State<AppState>,
    Path((number, product_code)): Path<(String, String)>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale = state.service.cancel_item(&number, &product_code).await?;
    Ok(Json(SaleResponse::from(&sale)))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok", "database": "up" })),
        )
    } else {
        tracing::warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "degraded", "database": "down" })),
        )
    }
}
