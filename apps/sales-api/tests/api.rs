//! End-to-end tests of the HTTP API over an in-memory database.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use salesdesk_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database");
    sales_api::app(db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn sale_body(items: Value) -> Value {
    json!({
        "customerName": "Ada Lovelace",
        "customerDocument": "123.456.789-00",
        "items": items,
    })
}

fn item(code: &str, quantity: i64, unit_price_cents: i64) -> Value {
    json!({
        "productName": format!("Product {code}"),
        "productCode": code,
        "quantity": quantity,
        "unitPriceCents": unit_price_cents,
    })
}

async fn create(app: &Router, items: Value) -> Value {
    let (status, body) = send(app, Method::POST, "/sales", Some(sale_body(items))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn number(sale: &Value) -> String {
    sale["number"].as_str().unwrap().to_string()
}

// =============================================================================
// Create / Get
// =============================================================================

#[tokio::test]
async fn create_applies_twenty_percent_tier() {
    let app = test_app().await;
    let sale = create(&app, json!([item("P-1", 10, 10_000)])).await;

    assert!(sale["number"].as_str().unwrap().starts_with("SALE-"));
    assert_eq!(sale["status"], "open");
    assert_eq!(sale["isCanceled"], false);
    assert_eq!(sale["version"], 1);
    assert_eq!(sale["totalAmountCents"], 80_000);

    let line = &sale["items"][0];
    assert_eq!(line["discountTier"], "twenty_percent");
    assert_eq!(line["discountPercent"], 20);
    assert_eq!(line["discountCents"], 20_000);
    assert_eq!(line["totalPriceCents"], 80_000);
}

#[tokio::test]
async fn create_sums_lines_with_ten_percent_tier() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 5, 10_000), item("B", 5, 15_000)])).await;

    assert_eq!(sale["items"][0]["totalPriceCents"], 45_000);
    assert_eq!(sale["items"][1]["totalPriceCents"], 67_500);
    assert_eq!(sale["totalAmountCents"], 112_500);
}

#[tokio::test]
async fn create_small_quantity_has_no_discount() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 3, 999)])).await;

    assert_eq!(sale["items"][0]["discountTier"], "none");
    assert_eq!(sale["totalAmountCents"], 2_997);
}

#[tokio::test]
async fn get_returns_created_sale() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 4, 2_500)])).await;

    let (status, body) = send(&app, Method::GET, &format!("/sales/{}", number(&sale)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sale);
}

#[tokio::test]
async fn get_unknown_is_not_found() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/sales/SALE-MISSING", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = test_app().await;
    let body = json!({
        "customerName": "",
        "customerDocument": "123",
        "items": [item("A", 21, 100), item("B", 1, 0)],
    });

    let (status, err) = send(&app, Method::POST, "/sales", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");

    let fields: Vec<&str> = err["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"customerName"));
    assert!(fields.contains(&"items[0].quantity"));
    assert!(fields.contains(&"items[1].unitPriceCents"));

    let (_, list) = send(&app, Method::GET, "/sales", None).await;
    assert_eq!(list["sales"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_rejects_unit_price_beyond_limit() {
    let app = test_app().await;
    let body = sale_body(json!([item("A", 20, 922_337_203_685_477_580)]));

    let (status, err) = send(&app, Method::POST, "/sales", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
    assert_eq!(err["errors"][0]["field"], "items[0].unitPriceCents");

    let (_, list) = send(&app, Method::GET, "/sales", None).await;
    assert_eq!(list["sales"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_rejects_empty_items_and_duplicate_codes() {
    let app = test_app().await;

    let (status, err) = send(&app, Method::POST, "/sales", Some(sale_body(json!([])))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["errors"][0]["field"], "items");

    let (status, err) = send(
        &app,
        Method::POST,
        "/sales",
        Some(sale_body(json!([item("A", 1, 100), item("A", 2, 100)]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["errors"][0]["field"], "items[1].productCode");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = test_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/sales")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let err: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(err["code"], "MALFORMED_REQUEST");
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn list_filters_by_date_range() {
    let app = test_app().await;
    let first = create(&app, json!([item("A", 1, 100)])).await;
    let second = create(&app, json!([item("B", 2, 100), item("C", 1, 50)])).await;

    let (status, body) = send(&app, Method::GET, "/sales", None).await;
    assert_eq!(status, StatusCode::OK);
    let sales = body["sales"].as_array().unwrap();
    assert_eq!(sales.len(), 2);

    let summary = sales
        .iter()
        .find(|s| s["number"] == second["number"])
        .unwrap();
    assert_eq!(summary["itemCount"], 2);
    assert_eq!(summary["totalAmountCents"], 250);
    assert_eq!(summary["customerName"], "Ada Lovelace");
    assert!(sales.iter().any(|s| s["number"] == first["number"]));

    let now = Utc::now();
    let start = (now - Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let end = (now + Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/sales?startDate={start}&endDate={end}"),
        None,
    )
    .await;
    assert_eq!(body["sales"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/sales?endDate=2000-01-01", None).await;
    assert_eq!(body["sales"].as_array().unwrap().len(), 0);

    let (_, body) = send(&app, Method::GET, &format!("/sales?startDate={end}"), None).await;
    assert_eq!(body["sales"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn list_rejects_bad_bounds() {
    let app = test_app().await;

    let (status, err) = send(&app, Method::GET, "/sales?startDate=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["errors"][0]["field"], "startDate");

    let (status, err) = send(
        &app,
        Method::GET,
        "/sales?startDate=2026-02-01&endDate=2026-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_replaces_items_and_bumps_version() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 1, 100)])).await;
    let uri = format!("/sales/{}", number(&sale));

    let mut body = sale_body(json!([item("B", 4, 1_000)]));
    body["customerName"] = json!("Grace Hopper");
    body["expectedVersion"] = json!(1);

    let (status, updated) = send(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["version"], 2);
    assert_eq!(updated["customerName"], "Grace Hopper");
    assert_eq!(updated["items"].as_array().unwrap().len(), 1);
    assert_eq!(updated["items"][0]["productCode"], "B");
    assert_eq!(updated["totalAmountCents"], 3_600);
    assert_eq!(updated["saleDate"], sale["saleDate"]);

    let (_, stored) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn update_with_stale_version_conflicts() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 1, 100)])).await;
    let uri = format!("/sales/{}", number(&sale));

    let mut body = sale_body(json!([item("A", 2, 100)]));
    body["expectedVersion"] = json!(1);
    let (status, _) = send(&app, Method::PUT, &uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = send(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "VERSION_CONFLICT");
}

#[tokio::test]
async fn update_unknown_is_not_found() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/sales/SALE-MISSING",
        Some(sale_body(json!([item("A", 1, 100)]))),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_canceled_sale_is_rejected() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 1, 100)])).await;
    let uri = format!("/sales/{}", number(&sale));

    let (status, canceled) = send(&app, Method::POST, &format!("{uri}/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = send(
        &app,
        Method::PUT,
        &uri,
        Some(sale_body(json!([item("Z", 9, 100)]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "SALE_CANCELED");

    let (_, stored) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(stored, canceled);
}

// =============================================================================
// Cancel
// =============================================================================

#[tokio::test]
async fn cancel_marks_sale_and_keeps_items() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 10, 100)])).await;
    let uri = format!("/sales/{}/cancel", number(&sale));

    let (status, canceled) = send(&app, Method::POST, &uri, Some(json!({ "expectedVersion": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(canceled["status"], "canceled");
    assert_eq!(canceled["isCanceled"], true);
    assert_eq!(canceled["version"], 2);
    assert_eq!(canceled["items"], sale["items"]);
    assert_eq!(canceled["totalAmountCents"], sale["totalAmountCents"]);

    let (_, list) = send(&app, Method::GET, "/sales", None).await;
    assert_eq!(list["sales"][0]["isCanceled"], true);
}

#[tokio::test]
async fn cancel_twice_is_rejected() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 1, 100)])).await;
    let uri = format!("/sales/{}/cancel", number(&sale));

    let (status, _) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "ALREADY_CANCELED");
}

#[tokio::test]
async fn cancel_unknown_is_not_found() {
    let app = test_app().await;
    let (status, _) = send(&app, Method::POST, "/sales/SALE-MISSING/cancel", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Item cancel
// =============================================================================

#[tokio::test]
async fn cancel_item_recomputes_total() {
    let app = test_app().await;
    let sale = create(&app, json!([item("A", 5, 10_000), item("B", 5, 15_000)])).await;
    let base = format!("/sales/{}", number(&sale));

    let (status, updated) = send(&app, Method::DELETE, &format!("{base}/items/A"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["totalAmountCents"], 67_500);
    assert_eq!(updated["version"], 2);

    let (status, err) = send(&app, Method::DELETE, &format!("{base}/items/A"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "NOT_FOUND");

    let (status, err) = send(&app, Method::DELETE, &format!("{base}/items/B"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_database_up() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
